pub mod app;
pub mod events;
pub mod layout;
pub mod state;
pub mod widgets;

pub use app::TuiApp;

use crate::core::SubmissionCoordinator;
use crate::core::error::Result;

pub async fn run_tui(coordinator: SubmissionCoordinator) -> Result<()> {
    let mut app = TuiApp::new(coordinator)?;
    app.run().await
}
