pub mod auth_service;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod card_service;
pub use card_service::{CardError, CardService, CardView, CellEntry, MAX_CELL_TEXT_LEN};

pub mod card_service_impl;
pub use card_service_impl::SeaOrmCardService;

pub mod leaderboard_service;
pub use leaderboard_service::{LeaderboardError, LeaderboardService};

pub mod leaderboard_service_impl;
pub use leaderboard_service_impl::SeaOrmLeaderboardService;

pub mod admin_service;
pub use admin_service::{AdminError, AdminService, AdminSettings};

pub mod admin_service_impl;
pub use admin_service_impl::SeaOrmAdminService;
