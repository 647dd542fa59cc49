//! Integration flows spanning the message bus, the module directory and the
//! runtime facade.

pub mod directory;
pub mod flows;

use std::time::Duration;

/// Poll `condition` until it holds or about a second has passed.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
