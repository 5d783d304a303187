mod blog;
mod post;
mod site;

pub use blog::{Blog, CollectionConfig};
pub use post::{Post, PostData};
pub use site::Site;
