/// Encode `value` as a JavaScript string literal.
pub(super) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Speaks `text` and sends back whether `speechSynthesis` exists.
pub(super) fn speak_script(text: &str, rate: f32, locale: &str) -> String {
    let text = js_string(text);
    let locale = js_string(locale);
    format!(
        r"(function() {{
            if (!window.speechSynthesis) {{
                dioxus.send(false);
                return;
            }}
            const utterance = new SpeechSynthesisUtterance({text});
            utterance.rate = {rate};
            utterance.lang = {locale};
            window.speechSynthesis.speak(utterance);
            dioxus.send(true);
        }})();"
    )
}

pub(super) const CANCEL_SCRIPT: &str =
    "if (window.speechSynthesis) { window.speechSynthesis.cancel(); }";

/// Starts one recognition and sends exactly one `{ transcript }` or `{ error }`
/// message back.
pub(super) fn recognize_script(locale: &str) -> String {
    let locale = js_string(locale);
    format!(
        r#"(function() {{
            const Recognition = window.SpeechRecognition || window.webkitSpeechRecognition;
            if (!Recognition) {{
                dioxus.send({{ unsupported: true }});
                return;
            }}
            const recognition = new Recognition();
            recognition.lang = {locale};
            recognition.interimResults = false;
            recognition.maxAlternatives = 1;
            let done = false;
            const finish = (message) => {{
                if (done) return;
                done = true;
                dioxus.send(message);
            }};
            recognition.onresult = (event) => {{
                const transcript = event.results[0] && event.results[0][0]
                    ? event.results[0][0].transcript
                    : "";
                finish({{ transcript }});
            }};
            recognition.onerror = (event) => finish({{ error: event.error || "recognition error" }});
            recognition.onend = () => finish({{ transcript: "" }});
            recognition.start();
        }})();"#
    )
}
