//! Database repositories.

mod article;
mod category;
mod comment;
mod discussion;
mod editor_profile;
mod follow;
mod media;
mod post;
mod tag;
mod user;

pub use article::ArticleRepository;
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use discussion::DiscussionRepository;
pub use editor_profile::EditorProfileRepository;
pub use follow::FollowRepository;
pub use media::MediaRepository;
pub use post::PostRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
