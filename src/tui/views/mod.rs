// View modules
//
// The main screen is drawn by `ui`; everything layered on top of it lives
// here.

pub mod modal;
