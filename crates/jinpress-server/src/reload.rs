//! Live reload endpoint and script injection.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, now_ms};

/// Path of the reload check endpoint.
pub(crate) const CHECK_PATH: &str = "/__livereload__/check";

/// Polling script injected into every served HTML page. The initial
/// timestamp is substituted at injection time from the server clock;
/// seeding from the browser clock would spin in a reload loop whenever
/// the client clock runs behind the server's.
const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(function () {
  var last = %INITIAL_TIMESTAMP%;
  setInterval(function () {
    fetch("/__livereload__/check?t=" + last)
      .then(function (res) { return res.json(); })
      .then(function (data) {
        if (data.reload) {
          location.reload();
        } else {
          last = data.timestamp;
        }
      })
      .catch(function () {});
  }, 1000);
})();
</script>"#;

#[derive(Debug, Deserialize)]
pub(crate) struct CheckParams {
    /// Client's last known rebuild timestamp (unix millis).
    #[serde(default)]
    t: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckResponse {
    reload: bool,
    timestamp: u64,
}

/// Reports whether a rebuild completed after the client's timestamp.
pub(crate) async fn check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckParams>,
) -> Json<CheckResponse> {
    Json(CheckResponse {
        reload: state.last_rebuild_ms() > params.t,
        timestamp: now_ms(),
    })
}

/// Injects the polling script before `</body>`, falling back to
/// `</html>`, falling back to appending.
pub(crate) fn inject_reload_script(html: &str) -> String {
    let script = reload_script(now_ms());
    let insert_at = html.rfind("</body>").or_else(|| html.rfind("</html>"));
    match insert_at {
        Some(pos) => format!("{}{script}\n{}", &html[..pos], &html[pos..]),
        None => format!("{html}{script}"),
    }
}

/// The polling script seeded with a server-side timestamp.
fn reload_script(initial_ms: u64) -> String {
    LIVE_RELOAD_SCRIPT.replace("%INITIAL_TIMESTAMP%", &initial_ms.to_string())
}
