//! The static device/browser fingerprint payload: data, not algorithm,
//! reproduced verbatim from `original_source/solver/fingerprint.go`.
//!
//! Key order matters (spec.md §6A) — `serde_json`'s `preserve_order`
//! feature keeps the map insertion-ordered through serialization.

use serde_json::{Map, Value};

use crate::config::defaults::DEFAULT_USER_AGENT;

fn set(map: &mut Map<String, Value>, key: &str, values: Vec<&str>) {
    map.insert(key.to_string(), Value::from(values));
}

/// Strips path/query/fragment from `target`, leaving `scheme://host[:port]`.
pub fn origin_from_url(target: &str) -> String {
    match url::Url::parse(target) {
        Ok(mut u) => {
            u.set_path("");
            u.set_query(None);
            u.set_fragment(None);
            u.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => target.to_string(),
    }
}

/// Builds the ordered fingerprint document for `target_url`, using
/// `now` (e.g. `"07/30/2026 12:00:00"`, the Go format's `01/02/2006
/// 15:04:05` layout) as `d.lastModified`'s value.
pub fn build(target_url: &str, now: &str) -> Map<String, Value> {
    let origin = origin_from_url(target_url);
    let (domain, base_uri) = match url::Url::parse(target_url) {
        Ok(u) => (u.host_str().unwrap_or_default().to_string(), target_url.to_string()),
        Err(_) => (String::new(), String::new()),
    };

    let mut o = Map::new();

    set(&mut o, "0", vec!["length", "innerWidth", "innerHeight", "scrollX", "pageXOffset", "scrollY", "pageYOffset", "screenX", "screenY", "screenLeft", "screenTop", "TEMPORARY", "n.maxTouchPoints"]);
    set(&mut o, "1", vec!["devicePixelRatio", "PERSISTENT", "d.childElementCount", "d.ELEMENT_NODE", "d.DOCUMENT_POSITION_DISCONNECTED"]);
    set(&mut o, "2", vec!["d.ATTRIBUTE_NODE", "d.DOCUMENT_POSITION_PRECEDING"]);
    set(&mut o, "3", vec!["d.TEXT_NODE"]);
    set(&mut o, "4", vec!["d.CDATA_SECTION_NODE", "d.DOCUMENT_POSITION_FOLLOWING"]);
    set(&mut o, "5", vec!["d.ENTITY_REFERENCE_NODE"]);
    set(&mut o, "6", vec!["d.ENTITY_NODE"]);
    set(&mut o, "7", vec!["d.PROCESSING_INSTRUCTION_NODE"]);
    set(&mut o, "8", vec!["n.deviceMemory", "d.COMMENT_NODE", "d.DOCUMENT_POSITION_CONTAINS"]);
    set(&mut o, "9", vec!["d.nodeType", "d.DOCUMENT_NODE"]);
    set(&mut o, "10", vec!["d.DOCUMENT_TYPE_NODE"]);
    set(&mut o, "11", vec!["d.DOCUMENT_FRAGMENT_NODE"]);
    set(&mut o, "12", vec!["d.NOTATION_NODE"]);
    set(&mut o, "16", vec!["n.hardwareConcurrency", "d.DOCUMENT_POSITION_CONTAINED_BY"]);
    set(&mut o, "32", vec!["d.DOCUMENT_POSITION_IMPLEMENTATION_SPECIFIC"]);
    set(&mut o, "1392", vec!["outerHeight"]);
    set(&mut o, "2560", vec!["outerWidth"]);

    set(&mut o, "o", vec![
        "window", "self", "document", "location", "customElements", "history", "navigation",
        "locationbar", "menubar", "personalbar", "scrollbars", "statusbar", "toolbar",
        "frames", "top", "parent", "frameElement", "navigator", "external", "screen",
        "visualViewport", "clientInformation", "styleMedia", "crypto", "scheduler",
        "performance", "trustedTypes", "indexedDB", "localStorage", "sessionStorage",
        "chrome", "cookieStore", "caches", "documentPictureInPicture", "sharedStorage",
        "viewport", "launchQueue", "speechSynthesis", "globalThis", "JSON", "Math",
        "Intl", "Atomics", "Reflect", "console", "CSS", "WebAssembly",
        "GPUBufferUsage", "GPUColorWrite", "GPUMapMode", "GPUShaderStage", "GPUTextureUsage",
        "n.scheduling", "n.userActivation", "n.geolocation", "n.plugins", "n.mimeTypes",
        "n.webkitTemporaryStorage", "n.webkitPersistentStorage", "n.connection",
        "n.windowControlsOverlay", "n.protectedAudience", "n.bluetooth", "n.clipboard",
        "n.credentials", "n.keyboard", "n.managed", "n.mediaDevices", "n.storage",
        "n.serviceWorker", "n.virtualKeyboard", "n.wakeLock", "n.userAgentData",
        "n.locks", "n.login", "n.ink", "n.mediaCapabilities", "n.devicePosture",
        "n.hid", "n.mediaSession", "n.permissions", "n.presentation", "n.serial",
        "n.gpu", "n.usb", "n.xr", "n.storageBuckets",
        "d.location", "d.implementation", "d.documentElement", "d.body", "d.head",
        "d.images", "d.embeds", "d.plugins", "d.links", "d.forms", "d.scripts",
        "d.defaultView", "d.anchors", "d.applets", "d.scrollingElement",
        "d.featurePolicy", "d.timeline", "d.children", "d.firstElementChild",
        "d.lastElementChild", "d.activeElement", "d.styleSheets", "d.fonts",
        "d.fragmentDirective", "d.childNodes", "d.firstChild", "d.lastChild",
    ]);

    set(&mut o, "F", vec![
        "closed", "crossOriginIsolated", "credentialless", "n.webdriver",
        "n.deprecatedRunAdAuctionEnforcesKAnonymity", "d.xmlStandalone", "d.hidden",
        "d.wasDiscarded", "d.prerendering", "d.webkitHidden", "d.fullscreen",
        "d.webkitIsFullScreen",
    ]);

    set(&mut o, "x", vec![
        "opener", "onsearch", "onappinstalled", "onbeforeinstallprompt", "onbeforexrselect",
        "onabort", "onbeforeinput", "onbeforematch", "onbeforetoggle", "onblur", "oncancel",
        "oncanplay", "oncanplaythrough", "onchange", "onclick", "onclose", "oncommand",
        "oncontentvisibilityautostatechange", "oncontextlost", "oncontextmenu",
        "oncontextrestored", "oncuechange", "ondblclick", "ondrag", "ondragend",
        "ondragenter", "ondragleave", "ondragover", "ondragstart", "ondrop",
        "ondurationchange", "onemptied", "onended", "onerror", "onfocus", "onformdata",
        "oninput", "oninvalid", "onkeydown", "onkeypress", "onkeyup", "onload",
        "onloadeddata", "onloadedmetadata", "onloadstart", "onmousedown", "onmouseenter",
        "onmouseleave", "onmousemove", "onmouseout", "onmouseover", "onmouseup",
        "onmousewheel", "onpause", "onplay", "onplaying", "onprogress", "onratechange",
        "onreset", "onresize", "onscroll", "onscrollend", "onsecuritypolicyviolation",
        "onseeked", "onseeking", "onselect", "onslotchange", "onstalled", "onsubmit",
        "onsuspend", "ontimeupdate", "ontoggle", "onvolumechange", "onwaiting",
        "fence", "n.doNotTrack", "d.doctype", "d.xmlEncoding", "d.xmlVersion",
        "d.currentScript", "d.onreadystatechange", "d.all",
    ]);

    o.insert(origin.clone(), Value::from(vec!["origin"]));

    set(&mut o, "u", vec!["event", "undefined"]);

    set(&mut o, "T", vec![
        "isSecureContext", "originAgentCluster", "offscreenBuffering",
        "n.pdfViewerEnabled", "n.cookieEnabled", "n.onLine",
        "d.fullscreenEnabled", "d.webkitFullscreenEnabled",
        "d.pictureInPictureEnabled", "d.isConnected",
    ]);

    set(&mut o, "N", vec![
        "alert", "atob", "blur", "btoa", "cancelAnimationFrame", "cancelIdleCallback",
        "captureEvents", "clearInterval", "clearTimeout", "close", "confirm",
        "createImageBitmap", "fetch", "find", "focus", "getComputedStyle", "getSelection",
        "matchMedia", "moveBy", "moveTo", "open", "postMessage", "print", "prompt",
        "queueMicrotask", "releaseEvents", "reportError", "requestAnimationFrame",
        "requestIdleCallback", "resizeBy", "resizeTo", "scroll", "scrollBy", "scrollTo",
        "setInterval", "setTimeout", "stop", "structuredClone",
        "addEventListener", "dispatchEvent", "removeEventListener",
        "Object", "Function", "Number", "parseFloat", "parseInt", "Boolean", "String",
        "Symbol", "Date", "Promise", "RegExp", "Error", "AggregateError", "EvalError",
        "RangeError", "ReferenceError", "SyntaxError", "TypeError", "URIError",
        "ArrayBuffer", "Uint8Array", "Int8Array", "Uint16Array", "Int16Array",
        "Uint32Array", "Int32Array", "BigUint64Array", "BigInt64Array",
        "Uint8ClampedArray", "Float32Array", "Float64Array", "DataView",
        "Map", "BigInt", "Set", "WeakMap", "WeakSet", "Proxy", "WeakRef",
        "decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent",
        "escape", "unescape", "eval", "isFinite", "isNaN",
        "XMLHttpRequest", "Request", "Response", "Headers", "URL", "URLSearchParams",
        "Blob", "File", "FileReader", "FormData", "WebSocket", "Worker",
        "Event", "CustomEvent", "EventTarget", "Node", "Element", "Document",
        "HTMLElement", "HTMLDivElement", "HTMLSpanElement", "HTMLInputElement",
        "d.getElementById", "d.getElementsByClassName", "d.getElementsByTagName",
        "d.querySelector", "d.querySelectorAll", "d.createElement", "d.createTextNode",
        "d.createDocumentFragment", "d.appendChild", "d.removeChild", "d.insertBefore",
        "d.addEventListener", "d.removeEventListener", "d.dispatchEvent",
    ]);

    set(&mut o, "E", vec!["Array"]);

    set(&mut o, "Infinity", vec!["Infinity"]);
    set(&mut o, "NaN", vec!["NaN"]);

    set(&mut o, "Google Inc.", vec!["n.vendor"]);
    set(&mut o, "Mozilla", vec!["n.appCodeName"]);
    set(&mut o, "Netscape", vec!["n.appName"]);
    o.insert(
        DEFAULT_USER_AGENT.trim_start_matches("Mozilla/5.0 ").to_string(),
        Value::from(vec!["n.appVersion"]),
    );
    set(&mut o, "Win32", vec!["n.platform"]);
    set(&mut o, "Gecko", vec!["n.product"]);
    o.insert(DEFAULT_USER_AGENT.to_string(), Value::from(vec!["n.userAgent"]));
    set(&mut o, "en-US", vec!["n.language"]);
    set(&mut o, "en-US,en", vec!["n.languages"]);

    o.insert("about:blank".to_string(), Value::from(vec!["d.URL", "d.documentURI"]));
    set(&mut o, "BackCompat", vec!["d.compatMode"]);
    set(&mut o, "UTF-8", vec!["d.characterSet", "d.charset", "d.inputEncoding"]);
    set(&mut o, "text/html", vec!["d.contentType"]);
    o.insert(domain, Value::from(vec!["d.domain"]));
    o.insert(base_uri, Value::from(vec!["d.referrer", "d.baseURI"]));
    set(&mut o, "s", vec!["d.cookie"]);
    o.insert(now.to_string(), Value::from(vec!["d.lastModified"]));
    set(&mut o, "complete", vec!["d.readyState"]);
    set(&mut o, "off", vec!["d.designMode"]);
    set(&mut o, "visible", vec!["d.visibilityState", "d.webkitVisibilityState"]);
    o.insert(String::new(), Value::from(vec!["d.adoptedStyleSheets"]));
    set(&mut o, "#document", vec!["d.nodeName"]);

    o
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_from_url_strips_path_and_query() {
        assert_eq!(
            origin_from_url("https://example.com/foo/bar?x=1#frag"),
            "https://example.com"
        );
    }

    #[test]
    fn build_preserves_insertion_order() {
        let fp = build("https://example.com", "07/30/2026 12:00:00");
        let keys: Vec<&String> = fp.keys().collect();
        assert_eq!(keys.first().map(|s| s.as_str()), Some("0"));
        assert!(keys.iter().any(|k| k.as_str() == "https://example.com"));
        assert_eq!(keys.last().map(|s| s.as_str()), Some("#document"));
    }

    #[test]
    fn build_embeds_last_modified_timestamp() {
        let fp = build("https://example.com", "07/30/2026 12:00:00");
        assert!(fp.contains_key("07/30/2026 12:00:00"));
    }

    #[test]
    fn fingerprint_round_trips_through_json_with_key_order_intact() {
        let fp = build("https://example.com", "07/30/2026 12:00:00");
        let json = serde_json::to_string(&fp).unwrap();
        let reparsed: Map<String, Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(fp.keys().collect::<Vec<_>>(), reparsed.keys().collect::<Vec<_>>());
    }
}
