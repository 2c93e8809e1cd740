pub mod booking;
pub mod conversation;
pub mod dialog;
pub mod recognition;
pub mod user;

pub use booking::{BookingDetails, BookingRecord};
pub use conversation::Conversation;
pub use dialog::{DialogState, DialogStep, Prompt};
pub use recognition::{DestinationInfo, DirectionInfo, OriginInfo, RecognitionResult};
pub use user::UserProfile;
