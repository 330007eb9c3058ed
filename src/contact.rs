//! Contact Form Validator
//!
//! Field-level validation with inline errors, and a simulated submit that
//! shows a success panel for a few seconds before resetting the form.
//! Nothing is sent over the network.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::{GetUntracked, RwSignal, Set};
use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::context::PageContext;
use crate::error::SetupResult;

const FORM_ID: &str = "contact-form";
const SUCCESS_ID: &str = "success-message";
const FIELD_SELECTOR: &str = "input, textarea";
const SUBMIT_SELECTOR: &str = "[type=submit]";
const GROUP_SELECTOR: &str = ".form-group";
const ERROR_TEXT_SELECTOR: &str = ".error-message";
const ERROR_CLASS: &str = "error";
const SHOW_CLASS: &str = "show";

const NAME_MIN_CHARS: usize = 2;
const MESSAGE_MIN_CHARS: usize = 10;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Which extra rule a field gets on top of "required"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Email,
    Message,
    Other,
}

impl FieldKind {
    /// Email is recognised by input type, name and message by element id
    pub fn classify(id: &str, input_type: &str) -> Self {
        if input_type == "email" {
            FieldKind::Email
        } else if id == "name" {
            FieldKind::Name
        } else if id == "message" {
            FieldKind::Message
        } else {
            FieldKind::Other
        }
    }
}

/// Validation failure; `Display` is the message shown under the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    NameTooShort,
    MessageTooShort,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "This field is required"),
            FieldError::InvalidEmail => write!(f, "Please enter a valid email address"),
            FieldError::NameTooShort => write!(f, "Name must be at least {} characters", NAME_MIN_CHARS),
            FieldError::MessageTooShort => {
                write!(f, "Message must be at least {} characters", MESSAGE_MIN_CHARS)
            }
        }
    }
}

impl std::error::Error for FieldError {}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Run the rules for `kind` against `value`. Rules past "required" only
/// look at non-empty (trimmed) values.
pub fn validate(kind: FieldKind, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    match kind {
        FieldKind::Email if !is_valid_email(value) => Err(FieldError::InvalidEmail),
        FieldKind::Name if value.chars().count() < NAME_MIN_CHARS => Err(FieldError::NameTooShort),
        FieldKind::Message if value.chars().count() < MESSAGE_MIN_CHARS => {
            Err(FieldError::MessageTooShort)
        }
        _ => Ok(()),
    }
}

/// Field event that can re-check a single field (submit always checks all)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    Blur,
    Input,
}

/// Input events only re-check a field that is already showing an error
pub fn should_validate(event: FieldEvent, currently_invalid: bool) -> bool {
    match event {
        FieldEvent::Blur => true,
        FieldEvent::Input => currently_invalid,
    }
}

/// Outcome of validating every field on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub results: Vec<Result<(), FieldError>>,
}

impl SubmitReport {
    /// Validate all fields; every field is checked even after a failure
    pub fn check<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (FieldKind, &'a str)>,
    {
        Self {
            results: fields.into_iter().map(|(kind, value)| validate(kind, value)).collect(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }

    pub fn first_invalid(&self) -> Option<usize> {
        self.results.iter().position(Result::is_err)
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }
}

/// Form lifecycle across a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    /// Success panel is up; further submits are ignored until the reset
    Sent,
}

/// What a submit did to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Arrived while the success panel was up; nothing was validated
    Ignored,
    Rejected(SubmitReport),
    Accepted(SubmitReport),
}

impl FormPhase {
    /// Validate through `check` unless a submit is already being shown as sent.
    /// A passing report moves the form to `Sent`.
    pub fn on_submit(&mut self, check: impl FnOnce() -> SubmitReport) -> SubmitOutcome {
        if *self == FormPhase::Sent {
            return SubmitOutcome::Ignored;
        }
        let report = check();
        if report.is_valid() {
            *self = FormPhase::Sent;
            SubmitOutcome::Accepted(report)
        } else {
            SubmitOutcome::Rejected(report)
        }
    }

    pub fn on_reset(&mut self) {
        *self = FormPhase::Editing;
    }

    /// CSS `display` of the form element
    pub fn form_display(self) -> &'static str {
        match self {
            FormPhase::Editing => "block",
            FormPhase::Sent => "none",
        }
    }

    /// Success panel is shown and the submit button disabled while sent
    pub fn is_sent(self) -> bool {
        self == FormPhase::Sent
    }
}

/// A form control with its group container
#[derive(Clone)]
struct FormField {
    control: FieldControl,
    kind: FieldKind,
}

#[derive(Clone)]
enum FieldControl {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl FormField {
    fn from_element(el: Element) -> Option<Self> {
        let control = match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => FieldControl::Input(input),
            Err(el) => FieldControl::TextArea(el.dyn_into::<HtmlTextAreaElement>().ok()?),
        };
        let kind = match &control {
            FieldControl::Input(input) => FieldKind::classify(&input.id(), &input.type_()),
            FieldControl::TextArea(area) => FieldKind::classify(&area.id(), "textarea"),
        };
        Some(Self { control, kind })
    }

    fn element(&self) -> &Element {
        match &self.control {
            FieldControl::Input(input) => input,
            FieldControl::TextArea(area) => area,
        }
    }

    fn value(&self) -> String {
        match &self.control {
            FieldControl::Input(input) => input.value(),
            FieldControl::TextArea(area) => area.value(),
        }
    }

    fn group(&self) -> Option<Element> {
        self.element().parent_element()
    }

    fn is_marked_invalid(&self) -> bool {
        self.group().map_or(false, |g| page_events::has_class(&g, ERROR_CLASS))
    }

    /// Validate and render the result onto the group and its error text
    fn check(&self) -> Result<(), FieldError> {
        let result = validate(self.kind, &self.value());
        self.render(result.err());
        result
    }

    fn render(&self, error: Option<FieldError>) {
        let Some(group) = self.group() else { return };
        page_events::set_class(&group, ERROR_CLASS, error.is_some());
        if let Ok(Some(text)) = group.query_selector(ERROR_TEXT_SELECTOR) {
            let message = error.map(|e| e.to_string()).unwrap_or_default();
            text.set_text_content(Some(&message));
        }
    }
}

fn scroll_group_into_view(group: &Element) {
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Center);
    group.scroll_into_view_with_scroll_into_view_options(&opts);
}

/// Elements toggled by a submit and the reset that follows it
#[derive(Clone)]
struct FormView {
    doc: Document,
    form: HtmlFormElement,
    success: Element,
    submit: Option<HtmlButtonElement>,
}

impl FormView {
    /// Mirror the phase onto the form, the success panel and the submit button
    fn render(&self, phase: FormPhase) {
        let form: &HtmlElement = &self.form;
        let _ = HtmlElement::style(form).set_property("display", phase.form_display());
        page_events::set_class(&self.success, SHOW_CLASS, phase.is_sent());
        if let Some(button) = &self.submit {
            button.set_disabled(phase.is_sent());
        }
    }

    /// Empty the form and clear every error regardless of state
    fn clear(&self) {
        self.form.reset();
        for group in page_events::query_all(&self.doc, GROUP_SELECTOR).unwrap_or_default() {
            page_events::set_class(&group, ERROR_CLASS, false);
        }
        for text in page_events::query_all(&self.doc, ERROR_TEXT_SELECTOR).unwrap_or_default() {
            text.set_text_content(Some(""));
        }
    }
}

pub fn init(ctx: &PageContext) -> SetupResult<()> {
    let doc = ctx.document.clone();
    let form: HtmlFormElement = page_events::by_id(&doc, FORM_ID)?;
    let success: Element = page_events::by_id(&doc, SUCCESS_ID)?;
    let submit = form
        .query_selector(SUBMIT_SELECTOR)?
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());

    let fields: Vec<FormField> = page_events::query_all_in(&form, FIELD_SELECTOR)?
        .into_iter()
        .filter_map(FormField::from_element)
        .collect();

    for field in &fields {
        let on_blur = field.clone();
        page_events::listen(field.element(), "blur", move |_| {
            if should_validate(FieldEvent::Blur, on_blur.is_marked_invalid()) {
                let _ = on_blur.check();
            }
        })?;
        let on_input = field.clone();
        page_events::listen(field.element(), "input", move |_| {
            if should_validate(FieldEvent::Input, on_input.is_marked_invalid()) {
                let _ = on_input.check();
            }
        })?;
    }

    let view = FormView { doc, form: form.clone(), success, submit };
    let phase = RwSignal::new(FormPhase::Editing);
    let pending_reset: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let reset_ms = ctx.config.success_reset_ms;

    page_events::listen(&form, "submit", move |ev| {
        ev.prevent_default();
        let mut next = phase.get_untracked();
        let outcome = next.on_submit(|| {
            let values: Vec<String> = fields.iter().map(FormField::value).collect();
            let report = SubmitReport::check(
                fields.iter().zip(&values).map(|(field, value)| (field.kind, value.as_str())),
            );
            for (field, result) in fields.iter().zip(&report.results) {
                field.render(result.as_ref().err().copied());
            }
            report
        });
        phase.set(next);

        match outcome {
            SubmitOutcome::Ignored => {
                log::debug!("[Contact] submit ignored while success panel is up");
            }
            SubmitOutcome::Rejected(report) => {
                log::debug!("[Contact] {} invalid fields", report.error_count());
                if let Some(group) = report.first_invalid().and_then(|i| fields[i].group()) {
                    scroll_group_into_view(&group);
                }
            }
            SubmitOutcome::Accepted(_) => {
                log::info!("[Contact] form valid, showing success panel");
                view.render(next);

                let view = view.clone();
                *pending_reset.borrow_mut() = Some(Timeout::new(reset_ms, move || {
                    let mut next = phase.get_untracked();
                    next.on_reset();
                    phase.set(next);
                    view.clear();
                    view.render(next);
                    log::debug!("[Contact] form reset");
                }));
            }
        }
    })?;

    Ok(())
}
