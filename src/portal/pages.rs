//! Status page data model and HTML templates.
//!
//! Three documents are served: a captive-portal landing page that bounces
//! the OS popup into a real browser, a bare success page that lets iOS
//! swap "Cancel" for "Done", and the live status page.  The status page is
//! filled by plain placeholder substitution.

use serde::{Deserialize, Serialize};

use crate::app::ports::StatusUpdate;

/// What network pollers see.  Serialised with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub resistors_per_kit: u8,
    pub kits: u8,
    /// `cutting` | `notCutting` | `paused`
    pub running_class: heapless::String<16>,
    /// `Cutting` | `Not Cutting` | `Paused`
    pub running_text: heapless::String<16>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub progress: Option<u8>,
}

impl From<&StatusUpdate> for StatusSnapshot {
    fn from(u: &StatusUpdate) -> Self {
        let mut running_class = heapless::String::new();
        let _ = running_class.push_str(u.run_status.css_class());
        let mut running_text = heapless::String::new();
        let _ = running_text.push_str(u.run_status.label());
        Self {
            resistors_per_kit: u.quantity_per_kit,
            kits: u.kit_count,
            running_class,
            running_text,
            progress: u.percent,
        }
    }
}

/// Page served before the operator has opened the portal in a browser.
pub const CAPTIVE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Resistor Cutter</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="refresh" content="0; url=http://www.neverssl.com/?redirect=true">
</head>
<body>
<h1><a href="http://www.neverssl.com/?redirect=true">Open resistor cutter status</a></h1>
</body>
</html>
"#;

/// Page served to the OS probe once the portal has been opened.
pub const SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Success</title>
<meta http-equiv="refresh" content="0; url=http://www.neverssl.com/?redirect=true">
</head>
<body>Success</body>
</html>
"#;

const MAIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Resistor Cutter</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="refresh" content="1">
<style>
body { display: flex; flex-direction: column; align-items: center; font-family: sans-serif; }
.row { display: flex; justify-content: center; margin: 5px; border: 2px solid black; border-radius: 8px; }
.row > div { width: 200px; height: 125px; display: flex; flex-direction: column; justify-content: center; align-items: center; }
.row h2 { margin-bottom: -10px; color: darkgrey; }
.cutting { background: #98ff98; }
.notCutting { background: #ff9898; }
.paused { background: #ffcc98; }
</style>
</head>
<body>
<h1>Resistor Cutter Status</h1>
<div class="row">
<div style="border-right: 1px solid black;"><h2>Resistors Per Kit</h2><h1>{{resistorsPerKit}}</h1></div>
<div><h2>Kits</h2><h1>{{kits}}</h1></div>
</div>
<div class="row {{runningClass}}">
<div><h1>{{runningText}}</h1>{{progress}}</div>
</div>
</body>
</html>
"#;

/// Fill the status page.
pub fn render_main(s: &StatusSnapshot) -> String {
    let progress = match s.progress {
        Some(p) => format!("<h2>{}%</h2>", p),
        None => String::new(),
    };
    MAIN_TEMPLATE
        .replace("{{resistorsPerKit}}", &s.resistors_per_kit.to_string())
        .replace("{{kits}}", &s.kits.to_string())
        .replace("{{runningClass}}", &s.running_class)
        .replace("{{runningText}}", &s.running_text)
        .replace("{{progress}}", &progress)
}
