use care_companion::{Answer, CompanionError, Outcome};
use html_escape::{encode_double_quoted_attribute, encode_text};

const TITLE: &str = "Mental Health Chatbot";

const ABOUT_ITEMS: [&str; 5] = [
    "This is a <em>Mental Health Chatbot</em> application.",
    "It summarizes the user's input and provides <em>supportive responses</em>.",
    "Simplifies <em>complex mental health concerns</em> into easy-to-understand terms.",
    "Offers <em>empathetic and supportive feedback</em> to users.",
    "Also provides assistance for <em>other medical conditions</em>.",
];

pub const MISSING_INPUT_WARNING: &str =
    "Please upload a PDF and enter your question before generating a response.";
pub const SUCCESS_BANNER: &str = "File uploaded and processed successfully!";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    About,
    Chatbot,
}

fn layout(active: Tab, body: &str) -> String {
    let tab = |tab: Tab, href: &str, label: &str| {
        let class = if tab == active { "tab active" } else { "tab" };
        format!(r#"<a class="{class}" href="{href}">{label}</a>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{TITLE}</title>
<style>
body {{ font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }}
nav {{ border-bottom: 1px solid #ccc; margin-bottom: 1.5rem; }}
.tab {{ display: inline-block; padding: .5rem 1rem; text-decoration: none; color: #333; }}
.tab.active {{ border-bottom: 3px solid #e4572e; font-weight: bold; }}
.banner {{ padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; }}
.success {{ background: #e3f6e8; color: #1d6b33; }}
.warning {{ background: #fff6d6; color: #7a5b00; }}
.error {{ background: #fde4e4; color: #8b1c1c; }}
.response {{ white-space: pre-wrap; line-height: 1.5; }}
textarea {{ width: 100%; min-height: 8rem; }}
</style>
</head>
<body>
<nav>{about}{chat}</nav>
{body}
</body>
</html>"#,
        about = tab(Tab::About, "/", "About"),
        chat = tab(Tab::Chatbot, "/chat", "Mental Health Chatbot"),
    )
}

pub fn about_page() -> String {
    let items: String = ABOUT_ITEMS
        .iter()
        .map(|item| format!("<li>{item}</li>"))
        .collect();
    layout(Tab::About, &format!("<h2>About</h2>\n<ol>{items}</ol>"))
}

/// The chatbot form, optionally followed by the result of a submission.
/// The question is echoed back into the textarea.
pub fn chat_page(question: &str, outcome: Option<&Outcome>) -> String {
    let form = format!(
        r#"<h2>Medical Chatbot: Your Mental Health Companion</h2>
<form method="post" action="/chat" enctype="multipart/form-data">
<p><label>Upload a PDF file: <input type="file" name="file" accept=".pdf,application/pdf"></label></p>
<p><label for="question">Enter your medical concerns:</label></p>
<textarea id="question" name="question" placeholder="{placeholder}">{question}</textarea>
<p><button type="submit">Get Response</button></p>
</form>"#,
        placeholder = encode_double_quoted_attribute("Describe what is on your mind"),
        question = encode_text(question),
    );

    let result = outcome.map(render_outcome).unwrap_or_default();
    layout(Tab::Chatbot, &format!("{form}\n{result}"))
}

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::MissingInput => banner("warning", MISSING_INPUT_WARNING),
        Outcome::Success(answer) => render_answer(answer),
        Outcome::Failure(error) => render_error(error),
    }
}

fn render_answer(answer: &Answer) -> String {
    let summary = &answer.summary;
    let mut note = format!(
        "{} pages, {} chunks, {} characters sent to the model",
        summary.pages, summary.chunks, summary.context_chars
    );
    if summary.truncated {
        note.push_str(" (document was shortened to fit)");
    }

    format!(
        "{}\n<h3>Chatbot Response:</h3>\n<div class=\"response\">{}</div>\n<p><small>{}</small></p>",
        banner("success", SUCCESS_BANNER),
        encode_text(&answer.response),
        encode_text(&note),
    )
}

pub fn render_error(error: &CompanionError) -> String {
    banner("error", &format!("Error: {error}"))
}

fn banner(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="banner {kind}" role="alert">{}</div>"#,
        encode_text(message)
    )
}
