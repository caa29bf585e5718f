pub mod email;
pub mod feed;
pub mod follow;
pub mod posts;
pub mod translate;

pub use email::EmailService;
pub use feed::FeedService;
pub use follow::FollowService;
pub use posts::PostService;
pub use translate::TranslatorClient;
