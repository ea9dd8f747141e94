// Module exports for list editing logic
pub mod reorder;       // Move up/down, relocate, drag-and-drop commit
pub mod pending;       // Unsaved change detection
pub mod draft_store;   // Draft persistence layer
pub mod pinned;        // Pinned review selection
pub mod remote;        // Backend collaborator traits
pub mod http_api;      // reqwest implementation of the remote traits
pub mod editor;        // List editor session
pub mod notices;       // Transient user-facing messages
pub mod insights;      // Rating distributions per review category
