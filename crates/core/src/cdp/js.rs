//! JavaScript snippets evaluated in the page.
//!
//! Element interaction goes through `Runtime.evaluate`; each builder returns
//! an IIFE whose result tells the caller whether the target element existed
//! (`false`/`null` means it did not). Selector and text arguments are
//! escaped for embedding in single-quoted JS string literals.

pub fn escape_js(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

pub fn fill_js(selector: &str, value: &str) -> String {
    let selector = escape_js(selector);
    let value = escape_js(value);
    format!(
        r#"(() => {{
            const el = document.querySelector('{selector}');
            if (!el) return false;
            el.focus();
            el.value = '{value}';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#
    )
}

pub fn click_js(selector: &str) -> String {
    let selector = escape_js(selector);
    format!(
        r#"(() => {{
            const el = document.querySelector('{selector}');
            if (!el) return false;
            el.click();
            return true;
        }})()"#
    )
}

pub fn click_nth_js(selector: &str, index: usize) -> String {
    let selector = escape_js(selector);
    format!(
        r#"(() => {{
            const el = document.querySelectorAll('{selector}')[{index}];
            if (!el) return false;
            el.click();
            return true;
        }})()"#
    )
}

/// Locate an element by visible text: prefer a leaf whose trimmed text is
/// exactly `text`, fall back to the first element containing it.
fn find_by_text_js(text: &str) -> String {
    let text = escape_js(text);
    format!(
        r#"const candidates = Array.from(
                document.querySelectorAll('a, button, span, li, td, th, div, label')
            );
            const el =
                candidates.find(e => e.childElementCount === 0 && e.textContent.trim() === '{text}')
                || candidates.find(e => e.textContent.includes('{text}'));"#
    )
}

pub fn click_text_js(text: &str) -> String {
    let find = find_by_text_js(text);
    format!(
        r#"(() => {{
            {find}
            if (!el) return false;
            el.click();
            return true;
        }})()"#
    )
}

pub fn hover_text_js(text: &str) -> String {
    let find = find_by_text_js(text);
    format!(
        r#"(() => {{
            {find}
            if (!el) return false;
            for (const type of ['mouseover', 'mouseenter', 'mousemove']) {{
                el.dispatchEvent(new MouseEvent(type, {{ bubbles: true }}));
            }}
            return true;
        }})()"#
    )
}

/// Match an option by value first, then by visible label.
pub fn select_option_js(selector: &str, value: &str) -> String {
    let selector = escape_js(selector);
    let value = escape_js(value);
    format!(
        r#"(() => {{
            const el = document.querySelector('{selector}');
            if (!el) return false;
            const options = Array.from(el.options);
            const option =
                options.find(o => o.value === '{value}')
                || options.find(o => o.label.trim() === '{value}' || o.text.trim() === '{value}');
            if (!option) return false;
            el.value = option.value;
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#
    )
}

pub fn count_js(selector: &str) -> String {
    let selector = escape_js(selector);
    format!(r#"document.querySelectorAll('{selector}').length"#)
}

pub fn inner_text_js(selector: &str, index: usize) -> String {
    let selector = escape_js(selector);
    format!(
        r#"(() => {{
            const el = document.querySelectorAll('{selector}')[{index}];
            return el ? el.innerText : null;
        }})()"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_js(r"it's a \ test"), r"it\'s a \\ test");
    }

    #[test]
    fn fill_embeds_escaped_value() {
        let js = fill_js("input[id='fPNumber']", "7799484");
        assert!(js.contains(r"input[id=\'fPNumber\']"));
        assert!(js.contains("'7799484'"));
    }

    #[test]
    fn count_is_a_bare_expression() {
        assert_eq!(
            count_js("td.part_details_label"),
            "document.querySelectorAll('td.part_details_label').length"
        );
    }
}
