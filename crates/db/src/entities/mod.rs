//! Database entities.

pub mod article;
pub mod article_media;
pub mod article_tag;
pub mod category;
pub mod comment;
pub mod discussion;
pub mod editor_profile;
pub mod follow;
pub mod media;
pub mod post;
pub mod tag;
pub mod user;

pub use article::Entity as Article;
pub use article_media::Entity as ArticleMedia;
pub use article_tag::Entity as ArticleTag;
pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use discussion::Entity as Discussion;
pub use editor_profile::Entity as EditorProfile;
pub use follow::Entity as Follow;
pub use media::Entity as Media;
pub use post::Entity as Post;
pub use tag::Entity as Tag;
pub use user::Entity as User;
