//! Shared helpers for integration tests

/// One message wrapper in the shape the t.me preview markup uses
///
/// `data_post` is the raw attribute value, e.g. `"chan/42"`. Pass an empty
/// `datetime` to omit the `<time>` element.
pub fn wrapper_html(data_post: &str, text_html: &str, datetime: &str) -> String {
    let time = if datetime.is_empty() {
        String::new()
    } else {
        format!(r#"<time datetime="{datetime}">label</time>"#)
    };
    format!(
        concat!(
            r#"<div class="tgme_widget_message_wrap js-widget_message_wrap">"#,
            r#"<div class="tgme_widget_message js-widget_message" data-post="{post}">"#,
            r#"<div class="tgme_widget_message_text js-message_text">{text}</div>"#,
            "{time}",
            "</div></div>"
        ),
        post = data_post,
        text = text_html,
        time = time,
    )
}

/// Wrap message wrappers in minimal page chrome
pub fn page_with(wrappers: &[String]) -> String {
    format!(
        "<html><head><title>feed</title></head><body><main>{}</main></body></html>",
        wrappers.join("\n")
    )
}
