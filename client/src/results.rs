use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, HtmlElement};

pub fn search_url(prefix: &str, query: &str) -> String {
    format!("{prefix}{}", String::from(js_sys::encode_uri_component(query)))
}

/// Replaces the contents of `results_el` with one search link per query.
pub fn render_results(document: &Document, results_el: &HtmlElement, queries: &[String], prefix: &str) {
    results_el.set_inner_html("");
    for query in queries {
        let Ok(row) = document.create_element("div") else {
            continue;
        };
        let Ok(element) = document.create_element("a") else {
            continue;
        };
        let Ok(link) = element.dyn_into::<HtmlAnchorElement>() else {
            continue;
        };
        link.set_href(&search_url(prefix, query));
        link.set_target("_blank");
        link.set_rel("noopener");
        let _ = link.set_attribute("class", "query");
        link.set_text_content(Some(query));
        let _ = row.append_child(&link);
        let _ = results_el.append_child(&row);
    }
}
