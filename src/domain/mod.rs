pub mod new_subscriber;
pub mod subscriber;
pub mod subscriber_email;
pub mod subscriber_key;
pub mod subscriber_name;
