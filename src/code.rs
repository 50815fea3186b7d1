//! Script generation.
//!
//! A batch renders to a single script that returns an object keyed by call
//! identifier:
//!
//! ```text
//! return {"r0":API.users.get({"user_ids":"1,2",}),"r1":API.wall.get({"owner_id":"-1",}),};
//! ```
//!
//! Keys and values are emitted as JSON string literals, which the scripting
//! language reads as ordinary strings. Reserved parameters never reach the
//! script: the transport supplies credentials and version itself.

use crate::batch::Batch;
use packer_types::format_value;

/// Render `batch` into script source. Calls appear in enqueue order.
pub fn render(batch: &Batch) -> String {
    let mut code = String::from("return {");

    for (id, call) in batch.iter() {
        code.push_str(&quote(id));
        code.push_str(":API.");
        code.push_str(&call.method);
        code.push_str("({");

        for (key, value) in call.params.visible() {
            code.push_str(&quote(key));
            code.push(':');
            code.push_str(&quote(&format_value(value, 0)));
            code.push(',');
        }

        code.push_str("}),");
    }

    code.push_str("};");
    code
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
