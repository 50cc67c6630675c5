//! Business services.

pub mod article;
pub mod comment;
pub mod email;
pub mod follow;
pub mod post;
pub mod reset;
pub mod timeline;
pub mod user;

pub use article::{ArticleService, ArticleView, CreateArticleInput, RegisterMediaInput};
pub use comment::{CommentService, CreateCommentInput};
pub use email::{EmailService, MailerConfig};
pub use follow::FollowService;
pub use post::{CreatePostInput, PostService};
pub use reset::{PerformResetInput, ResetService};
pub use timeline::{Page, PostVariant, TimelineService};
pub use user::{avatar_url, CreateUserInput, UpdateProfileInput, UserService};
