use preview_protocol::{CHANNEL, PROTOCOL_VERSION};

use crate::config::ComposerConfig;

/// Attribute carrying the stable id of an editable element
pub const ELEMENT_ID_ATTR: &str = "data-preview-id";

/// Attribute marking scripts injected by the composer
pub const RUNTIME_ATTR: &str = "data-preview-runtime";

// Envelope poster, timer registry and error reporter. Spliced first into
// <head> so it runs before every project script; the reporters below reach
// it through `window.__preview`.
const RUNTIME_JS: &str = r#"(function () {
  var CHANNEL = {{CHANNEL}}, VERSION = {{VERSION}}, INSTANCE = {{INSTANCE}};
  function post(type, payload) {
    try {
      window.parent.postMessage({ channel: CHANNEL, version: VERSION, instance: INSTANCE, type: type, payload: payload }, "*");
    } catch (_) {}
  }
  var intervals = new Set(), timeouts = new Set();
  var nativeSetInterval = window.setInterval, nativeClearInterval = window.clearInterval;
  var nativeSetTimeout = window.setTimeout, nativeClearTimeout = window.clearTimeout;
  window.setInterval = function () {
    var id = nativeSetInterval.apply(window, arguments);
    intervals.add(id);
    return id;
  };
  window.clearInterval = function (id) {
    intervals.delete(id);
    return nativeClearInterval.call(window, id);
  };
  window.setTimeout = function (fn, delay) {
    if (typeof fn !== "function") return nativeSetTimeout.apply(window, arguments);
    var args = Array.prototype.slice.call(arguments, 2);
    var id = nativeSetTimeout.call(window, function () {
      timeouts.delete(id);
      fn.apply(window, args);
    }, delay);
    timeouts.add(id);
    return id;
  };
  window.clearTimeout = function (id) {
    timeouts.delete(id);
    return nativeClearTimeout.call(window, id);
  };
  window.addEventListener("pagehide", function () {
    intervals.forEach(function (id) { nativeClearInterval.call(window, id); });
    timeouts.forEach(function (id) { nativeClearTimeout.call(window, id); });
    intervals.clear();
    timeouts.clear();
  });
  window.addEventListener("error", function (event) {
    var message = event.message || (event.error && event.error.message) || "Script error";
    post("error", { message: String(message) });
  });
  window.addEventListener("unhandledrejection", function (event) {
    var reason = event.reason;
    post("error", { message: "Unhandled promise rejection: " + String((reason && reason.message) || reason) });
  });
  window.__preview = { post: post, channel: CHANNEL, version: VERSION, instance: INSTANCE };
})();"#;

const HEIGHT_REPORTER_JS: &str = r#"(function () {
  var preview = window.__preview;
  if (!preview) return;
  var last = -1;
  // Content heights only; root client/scroll heights are floored at the viewport
  function measure() {
    var body = document.body, root = document.documentElement;
    return Math.max(
      body ? body.scrollHeight : 0,
      body ? body.offsetHeight : 0,
      root.offsetHeight
    );
  }
  function report() {
    var height = measure();
    if (height === last) return;
    last = height;
    preview.post("height", { height: height });
  }
  preview.reportHeight = report;
  window.addEventListener("load", report);
  window.setInterval(report, {{INTERVAL}});
  report();
})();"#;

const EDIT_MODE_JS: &str = r#"(function () {
  var preview = window.__preview;
  if (!preview) return;
  var SELECTOR = {{SELECTOR}}, ATTR = {{ATTR}};
  var next = 0;
  function tag() {
    document.querySelectorAll(SELECTOR).forEach(function (el) {
      if (el.hasAttribute(ATTR) || !el.textContent || !el.textContent.trim()) return;
      el.setAttribute(ATTR, "pv-" + next++);
    });
  }
  tag();
  window.addEventListener("load", tag);
  document.addEventListener("click", function (event) {
    var target = event.target;
    var el = target && target.closest ? target.closest("[" + ATTR + "]") : null;
    if (!el) return;
    event.preventDefault();
    event.stopPropagation();
    var style = window.getComputedStyle(el), rect = el.getBoundingClientRect();
    preview.post("elementSelected", {
      elementId: el.getAttribute(ATTR),
      text: el.textContent.trim(),
      color: style.color,
      x: rect.left,
      y: rect.bottom,
      fontSize: style.fontSize
    });
  }, true);
  window.addEventListener("message", function (event) {
    var data = event.data;
    if (event.source !== window.parent || !data) return;
    if (data.channel !== preview.channel || data.version !== preview.version) return;
    if (data.instance !== preview.instance || data.type !== "textUpdate") return;
    var update = data.payload || {};
    var el = document.querySelector("[" + ATTR + "=\"" + String(update.elementId).replace(/["\\]/g, "\\$&") + "\"]");
    if (!el) return;
    if (update.newText != null) el.textContent = update.newText;
    if (update.newColor != null) el.style.color = update.newColor;
    if (update.newFontSize != null) el.style.fontSize = update.newFontSize;
    if (update.newX != null || update.newY != null) {
      el.style.position = "relative";
      if (update.newX != null) el.style.left = update.newX + "px";
      if (update.newY != null) el.style.top = update.newY + "px";
    }
    if (preview.reportHeight) preview.reportHeight();
  });
})();"#;

const FIXED_HEIGHT_JS: &str = r#"(function () {
  function report() {
    try {
      window.parent.postMessage({ channel: {{CHANNEL}}, version: {{VERSION}}, instance: {{INSTANCE}}, type: "height", payload: { height: {{HEIGHT}} } }, "*");
    } catch (_) {}
  }
  window.addEventListener("load", report);
  report();
})();"#;

/// Scripts injected into a live document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrumentation {
    /// Goes before `</head>`
    pub head: String,

    /// Goes before `</body>`
    pub body: String,
}

impl Instrumentation {
    /// Instrumentation for a flat document bound to `instance`
    pub fn live(instance: &str, config: &ComposerConfig) -> Self {
        let runtime = RUNTIME_JS
            .replace("{{CHANNEL}}", &js_string(CHANNEL))
            .replace("{{VERSION}}", &PROTOCOL_VERSION.to_string())
            .replace("{{INSTANCE}}", &js_string(instance));

        let mut body = script_tag(
            &HEIGHT_REPORTER_JS.replace("{{INTERVAL}}", &config.height_interval_ms.to_string()),
        );
        if config.edit_mode {
            body.push('\n');
            body.push_str(&script_tag(
                &EDIT_MODE_JS
                    .replace("{{SELECTOR}}", &js_string(&config.editable_selector))
                    .replace("{{ATTR}}", &js_string(ELEMENT_ID_ATTR)),
            ));
        }

        Self {
            head: script_tag(&runtime),
            body,
        }
    }

    /// Single script reporting a constant height; runs no project code
    pub fn fixed_height(instance: &str, height: f64) -> String {
        script_tag(
            &FIXED_HEIGHT_JS
                .replace("{{CHANNEL}}", &js_string(CHANNEL))
                .replace("{{VERSION}}", &PROTOCOL_VERSION.to_string())
                .replace("{{INSTANCE}}", &js_string(instance))
                .replace("{{HEIGHT}}", &format!("{}", height.round())),
        )
    }
}

fn script_tag(body: &str) -> String {
    format!("<script {RUNTIME_ATTR}>\n{body}\n</script>")
}

/// Double-quoted JavaScript string literal, safe inside a `<script>` element
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
