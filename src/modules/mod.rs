// Module exports for pure logic
pub mod navigation;      // Address resolution + command dispatch
pub mod downloads;       // Collision-free download paths
pub mod tabs;            // Tab bookkeeping
pub mod shortcuts;       // Site selector entries
pub mod credentials;     // In-memory password list
