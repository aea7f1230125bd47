use std::collections::HashMap;

use crate::domain::subscriber::Subscriber;

pub mod templates {
    pub const WELCOME: &str = "Hi {{firstName}},\n\nWelcome to the newsletter!\n\nOver the coming weeks you'll receive practical strategies, real-world case studies and expert insights straight to your inbox.\n\nIf you have any questions, just reply to this email.\n\nBest regards,\nThe Newsletter Team";

    pub const NEWSLETTER: &str = "Hi {{firstName}},\n\nThis week in the newsletter...\n\n[Your newsletter content here]\n\nBest regards,\nThe Newsletter Team";

    pub const ANNOUNCEMENT: &str = "Hi {{firstName}},\n\nWe have an important update to share with you...\n\n[Your announcement here]\n\nBest regards,\nThe Newsletter Team";
}

/// Single-pass `{{identifier}}` substitution. Tokens with no binding pass
/// through unchanged; there is no nesting and no escaping.
pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) if is_identifier(&after[..end]) => {
                let key = &after[..end];

                match vars.get(key) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push_str("{{");
                        output.push_str(key);
                        output.push_str("}}");
                    }
                }

                rest = &after[end + 2..];
            }
            _ => {
                output.push_str("{{");
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

pub fn personalize(template: &str, subscriber: &Subscriber) -> String {
    let vars = HashMap::from([
        ("firstName", subscriber.first_name.as_ref()),
        ("email", subscriber.email.as_ref()),
        ("source", subscriber.source.as_str()),
    ]);

    render(template, &vars)
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|char| char.is_alphanumeric() || char == '_')
}
