//! procedura-search
//!
//! Nearest-neighbour lookup over the procedure reference table: a Supabase
//! (PostgREST + pgvector) RPC client, an in-memory cosine store for local
//! runs and tests, and an always-empty store for when neither is configured.

pub mod empty;
pub mod error;
pub mod memory;
pub mod supabase;

pub use empty::EmptyStore;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;
