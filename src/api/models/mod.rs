pub mod views;

pub use views::ViewResponse;
