pub mod comment;
pub mod conversation;
pub mod item;
pub mod item_location;
pub mod user;

pub use comment::{Entity as Comment, Model as CommentModel};
pub use conversation::{Entity as Conversation, Model as ConversationModel};
pub use item::{Entity as Item, Model as ItemModel};
pub use item_location::{Entity as ItemLocation, Model as ItemLocationModel};
pub use user::{Entity as User, Model as UserModel};
