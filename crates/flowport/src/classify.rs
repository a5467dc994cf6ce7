//! Filename-based workflow classification.
//!
//! Workflow files are conventionally named after the integrations they use
//! (`0001_Telegram_Schedule_Automation_Scheduled.json`), so the category is
//! derived from keywords in the file stem. Rules are checked in order and the
//! first keyword found (case-insensitive substring) decides. No match yields
//! an empty label, which readers show as "Uncategorized".

use std::path::Path;
use std::sync::OnceLock;

/// Built-in rules, checked top to bottom.
const BUILTIN_RULES: &[(&str, &[&str])] = &[
    (
        "AI Agent Development",
        &[
            "openai", "chatgpt", "gpt", "anthropic", "claude", "gemini", "mistral", "ollama",
            "langchain", "llm", "agent",
        ],
    ),
    (
        "Communication & Messaging",
        &[
            "telegram", "slack", "discord", "whatsapp", "mattermost", "teams", "twilio", "sms",
            "gmail", "outlook", "email", "imap", "smtp",
        ],
    ),
    (
        "CRM & Sales",
        &["hubspot", "salesforce", "pipedrive", "zoho", "agilecrm", "copper", "crm"],
    ),
    (
        "Social Media Management",
        &[
            "twitter", "linkedin", "facebook", "instagram", "reddit", "mastodon", "tiktok",
            "youtube",
        ],
    ),
    (
        "E-commerce & Retail",
        &["shopify", "woocommerce", "magento", "gumroad", "ecommerce"],
    ),
    (
        "Financial & Accounting",
        &["stripe", "paypal", "quickbooks", "xero", "chargebee", "invoice", "invoiceninja"],
    ),
    (
        "Marketing & Advertising Automation",
        &[
            "mailchimp", "sendgrid", "activecampaign", "convertkit", "lemlist", "mautic",
            "marketing",
        ],
    ),
    (
        "Project Management",
        &["asana", "trello", "jira", "clickup", "todoist", "monday", "taskade", "linear"],
    ),
    (
        "Cloud Storage & File Management",
        &["googledrive", "dropbox", "onedrive", "nextcloud", "awss3", "s3", "ftp", "drive"],
    ),
    (
        "Data Processing & Analysis",
        &[
            "googlesheets", "spreadsheet", "sheets", "airtable", "baserow", "notion", "postgres",
            "mysql", "mongodb", "redis", "database", "csv",
        ],
    ),
    (
        "Web Scraping & Data Extraction",
        &["scrape", "scraping", "crawl", "rssfeed", "rss", "httprequest", "http"],
    ),
    (
        "Technical Infrastructure & DevOps",
        &[
            "github", "gitlab", "bitbucket", "docker", "kubernetes", "jenkins", "sentry",
            "grafana", "cloudflare", "uptimerobot", "ssh",
        ],
    ),
    (
        "Creative Design Automation",
        &["figma", "canva", "bannerbear", "image", "photo"],
    ),
    (
        "Creative Content & Video Automation",
        &["video", "wordpress", "ghost", "contentful", "medium", "blog"],
    ),
    (
        "Business Process Automation",
        &[
            "calendly", "googlecalendar", "calendar", "typeform", "jotform", "googleforms",
            "docusign",
        ],
    ),
];

#[derive(Debug, Clone)]
struct Rule {
    keyword: String,
    category: String,
}

/// Ordered keyword → category rules.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Classifier {
    /// Classifier with only the built-in rules.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .flat_map(|(category, keywords)| {
                keywords.iter().map(move |keyword| Rule {
                    keyword: keyword.to_string(),
                    category: category.to_string(),
                })
            })
            .collect();
        Self { rules }
    }

    /// Built-in rules preceded by `extra` (keyword, category) pairs.
    ///
    /// Empty keywords are skipped.
    pub fn with_rules<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut rules: Vec<Rule> = extra
            .into_iter()
            .filter(|(keyword, _)| !keyword.trim().is_empty())
            .map(|(keyword, category)| Rule {
                keyword: keyword.trim().to_lowercase(),
                category,
            })
            .collect();
        rules.extend(Self::builtin().rules);
        Self { rules }
    }

    /// Category label for a workflow filename, or "" when nothing matches.
    pub fn classify(&self, filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        self.rules
            .iter()
            .find(|rule| stem.contains(&rule.keyword))
            .map(|rule| rule.category.clone())
            .unwrap_or_default()
    }
}

/// Classify with the built-in rules.
pub fn classify(filename: &str) -> String {
    static BUILTIN: OnceLock<Classifier> = OnceLock::new();
    BUILTIN.get_or_init(Classifier::builtin).classify(filename)
}

/// Label shown for an empty category.
pub fn display_category(category: &str) -> &str {
    if category.is_empty() {
        "Uncategorized"
    } else {
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_integration() {
        assert_eq!(
            classify("0001_Telegram_Schedule_Automation_Scheduled.json"),
            "Communication & Messaging"
        );
        assert_eq!(
            classify("0042_Hubspot_Create_Triggered.json"),
            "CRM & Sales"
        );
        assert_eq!(
            classify("1200_Googlesheets_Update_Webhook.json"),
            "Data Processing & Analysis"
        );
    }

    #[test]
    fn test_first_rule_wins() {
        // AI rules precede messaging rules
        assert_eq!(
            classify("0100_Telegram_Openai_Bot.json"),
            "AI Agent Development"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("SLACK_ALERTS.json"), "Communication & Messaging");
    }

    #[test]
    fn test_no_match_is_empty() {
        assert_eq!(classify("0099_Manual_Stickynote_Automation.json"), "");
        assert_eq!(classify(""), "");
    }

    #[test]
    fn test_extension_ignored() {
        // "json" is never a keyword source
        assert_eq!(classify("plain.json"), "");
    }

    #[test]
    fn test_custom_rules_take_precedence() {
        let classifier = Classifier::with_rules([
            ("Acme".to_string(), "Internal Tools".to_string()),
            ("slack".to_string(), "Chat Ops".to_string()),
            ("  ".to_string(), "Ignored".to_string()),
        ]);
        assert_eq!(classifier.classify("acme_sync.json"), "Internal Tools");
        assert_eq!(classifier.classify("slack_notify.json"), "Chat Ops");
        assert_eq!(
            classifier.classify("telegram_notify.json"),
            "Communication & Messaging"
        );
        assert_eq!(classifier.classify("nothing_here.json"), "");
    }

    #[test]
    fn test_display_category() {
        assert_eq!(display_category(""), "Uncategorized");
        assert_eq!(display_category("CRM & Sales"), "CRM & Sales");
    }
}
