mod auth;
mod device;
mod playlist;
pub mod resync;
pub mod retry;
mod state;
pub mod tracks;

pub use auth::TOKEN_KEY;
pub use auth::TokenManager;
pub use device::DeviceError;
pub use device::DeviceSelection;
pub use device::SelectionSource;
pub use device::select_device;
pub use playlist::PLAYLIST_KEY;
pub use playlist::find_playlist_by_name;
pub use playlist::resolve_scratch_playlist;
pub use resync::BatchReport;
pub use resync::clear_playlist;
pub use resync::insert_tracks;
pub use retry::BatchOutcome;
pub use retry::BatchPolicy;
pub use retry::run_batch;
pub use state::StateStore;
pub use state::StoreError;
pub use state::StoreGuard;
pub use tracks::collect_tracks;
