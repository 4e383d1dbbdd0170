// Reusable UI widgets

pub mod connectivity_overlay;
pub mod footer;
pub mod navigation;
pub mod popup;
pub mod text_input;
pub mod toast;

pub use connectivity_overlay::{ConnectivityOverlay, OVERLAY_TRANSITION};
pub use footer::Footer;
pub use navigation::NavigationContainer;
pub use popup::Popup;
pub use text_input::{TextInputWidget, TextInputWidgetExt};
pub use toast::{Toast, ToastManager, ToastVariant};
