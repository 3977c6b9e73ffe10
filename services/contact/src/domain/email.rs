use crate::domain::types::ContactForm;

/// Notification email rendered from a contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ContactEmail {
    pub fn compose(form: &ContactForm) -> Self {
        let subject = format!("New Portfolio Message from {}", form.name);
        let text = format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
            form.name, form.email, form.message
        );
        let html = format!(
            concat!(
                "<h3>New Portfolio Message</h3>\n",
                "<p><strong>Name:</strong> {name}</p>\n",
                "<p><strong>Email:</strong> {email}</p>\n",
                "<br/>\n",
                "<p><strong>Message:</strong></p>\n",
                "<p style=\"padding: 10px; background-color: #f4f4f4; border-radius: 5px;\">{message}</p>\n",
            ),
            name = escape_html(&form.name),
            email = escape_html(&form.email),
            message = escape_html(&form.message).replace('\n', "<br>"),
        );
        Self {
            subject,
            text,
            html,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
