use crate::application::{
    error::{ErrorReport, HttpError},
    navigation::viewer_location,
    renderer::{AngRenderer, RenderOutcome, RenderPane},
};
use crate::domain::{
    ang::AngNumber,
    lines::{LineRecord, WordToken},
};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use super::container::HtmlBuffer;

/// Markup shown when even the error template cannot be rendered.
pub const FALLBACK_ERROR_MARKUP: &str =
    r#"<div class="error">Error loading Ang. Please try again.</div>"#;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_markup<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_markup",
            "Template rendering failed",
            err,
        )
    })
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    render_markup(template).map(Html).map_err(HttpError::from)
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let mut response = (StatusCode::NOT_FOUND, "Resource not found").into_response();
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Template)]
#[template(path = "ang/loading.html")]
pub struct LoadingTemplate {
    pub ang: AngNumber,
}

#[derive(Template)]
#[template(path = "ang/empty.html")]
pub struct EmptyTemplate {
    pub ang: AngNumber,
}

#[derive(Template)]
#[template(path = "ang/error.html")]
pub struct ErrorTemplate;

#[derive(Clone)]
pub struct LineView {
    pub line_id: String,
    pub dom_id: String,
    pub words: Vec<WordToken>,
    pub transliteration: Option<String>,
}

impl From<&LineRecord> for LineView {
    fn from(record: &LineRecord) -> Self {
        Self {
            line_id: record.id.clone().unwrap_or_default(),
            dom_id: record.dom_id.clone(),
            words: record.words(),
            transliteration: record.secondary_text.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "ang/lines.html")]
pub struct AngLinesTemplate {
    pub ang: AngNumber,
    pub lines: Vec<LineView>,
}

impl AngLinesTemplate {
    pub fn new(ang: AngNumber, records: &[LineRecord]) -> Self {
        Self {
            ang,
            lines: records.iter().map(LineView::from).collect(),
        }
    }
}

/// Full viewer document wrapping the container markup and the toolbar.
#[derive(Template)]
#[template(path = "viewer.html")]
pub struct ViewerTemplate {
    pub ang: AngNumber,
    pub first: AngNumber,
    pub last: AngNumber,
    pub is_first: bool,
    pub is_last: bool,
    pub location: String,
    pub navigate_path: &'static str,
    pub content_html: String,
}

impl ViewerTemplate {
    pub fn new(
        ang: AngNumber,
        location: String,
        navigate_path: &'static str,
        content_html: String,
    ) -> Self {
        Self {
            ang,
            first: AngNumber::FIRST,
            last: AngNumber::LAST,
            is_first: ang == AngNumber::FIRST,
            is_last: ang == AngNumber::LAST,
            location,
            navigate_path,
            content_html,
        }
    }
}

/// Render `ang` into a fresh pane and wrap the result in the viewer document.
pub async fn compose_viewer(
    renderer: &AngRenderer,
    ang: AngNumber,
    navigate_path: &'static str,
) -> (RenderOutcome, ViewerTemplate) {
    let pane = RenderPane::new(HtmlBuffer::new());
    let outcome = renderer.render(ang, &pane).await;
    let content_html = pane
        .into_container()
        .into_markup()
        .unwrap_or_else(|| FALLBACK_ERROR_MARKUP.to_string());

    let template = ViewerTemplate::new(ang, viewer_location(ang), navigate_path, content_html);
    (outcome, template)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ang(value: i64) -> AngNumber {
        AngNumber::new(value).expect("valid ang")
    }

    #[test]
    fn words_render_as_addressable_spans() {
        let record = LineRecord::new(Some("9".into()), "ਸਤਿ ਨਾਮੁ".into(), Some("sat naam".into()))
            .expect("record");
        let html = render_markup(AngLinesTemplate::new(ang(1), &[record])).expect("rendered");

        assert!(html.contains(
            r#"<span class="gurmukhi-word" data-word-index="0">ਸਤਿ</span> <span class="gurmukhi-word" data-word-index="1">ਨਾਮੁ</span>"#
        ));
        assert!(html.contains(r#"data-line-id="9""#));
        assert!(html.contains(r#"id="gurmukhi-9""#));
        assert!(html.contains(r#"<div class="g-line-translit">sat naam</div>"#));
        assert!(html.contains("<h2>Ang 1</h2>"));
    }

    #[test]
    fn transliteration_block_is_omitted_when_absent() {
        let record = LineRecord::new(None, "ਨਾਮੁ".into(), None).expect("record");
        let html = render_markup(AngLinesTemplate::new(ang(2), &[record])).expect("rendered");

        assert!(!html.contains("g-line-translit"));
        assert!(html.contains(r#"data-line-id="""#));
    }

    #[test]
    fn line_text_is_escaped() {
        let record = LineRecord::new(None, "<b>ਸਤਿ</b>".into(), None).expect("record");
        let html = render_markup(AngLinesTemplate::new(ang(3), &[record])).expect("rendered");

        assert!(!html.contains("<b>"));
        assert!(html.contains("&#60;b&#62;ਸਤਿ&#60;/b&#62;"));
    }

    #[test]
    fn placeholders_name_the_ang() {
        let loading = render_markup(LoadingTemplate { ang: ang(42) }).expect("loading");
        assert!(loading.contains("Loading Ang 42..."));

        let empty = render_markup(EmptyTemplate { ang: ang(42) }).expect("empty");
        assert!(empty.contains("No content found for Ang 42"));

        let error = render_markup(ErrorTemplate).expect("error");
        assert_eq!(error.trim(), FALLBACK_ERROR_MARKUP);
    }

    #[test]
    fn viewer_disables_prev_on_first_ang() {
        let html = render_markup(ViewerTemplate::new(
            AngNumber::FIRST,
            "/ang.html?ang=1#ang=1".into(),
            "/ang/navigate",
            "<p>content</p>".into(),
        ))
        .expect("viewer");

        assert!(html.contains(r#"value="prev" disabled"#));
        assert!(!html.contains(r#"value="next" disabled"#));
        assert!(html.contains("<p>content</p>"));
    }
}
