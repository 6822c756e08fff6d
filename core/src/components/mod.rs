pub mod calendar;
pub mod grid;
pub mod login;
pub mod menu;
pub mod panel;

pub use calendar::Calendar;
pub use grid::{Grid, GridRow, PageAction};
pub use login::LoginForm;
pub use menu::{Menu, MenuItem};
pub use panel::Panel;
