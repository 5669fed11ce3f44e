// Outbound email composition
//
// Templates are composed here and dispatched explicitly from the workflow;
// there is no ambient hook mechanism between a state change and its email.

use crate::source::types::SourceRecord;

/// A composed message, ready for the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub body: String,
}

fn subject(site_name: &str, subject: &str) -> String {
    format!("[{site_name}] {subject}")
}

/// Asks the submitter to confirm their email address.
pub fn confirmation(site_name: &str, confirm_url: &str) -> Email {
    Email {
        subject: subject(site_name, "Please confirm your email address"),
        body: format!(
            "Thank you for submitting yourself to {site_name}!\n\
             \n\
             Please click this link to confirm your email address:\n\
             {confirm_url}\n"
        ),
    }
}

/// Asks the operator to publish or trash a confirmed submission.
pub fn moderation(
    site_name: &str,
    record: &SourceRecord,
    publish_url: &str,
    trash_url: &str,
) -> Email {
    Email {
        subject: subject(
            site_name,
            &format!("Please moderate new submission from {}", record.name),
        ),
        body: format!(
            "Please moderate this new submission:\n\
             {content}\n\
             \n\
             Publish it: {publish_url}\n\
             \n\
             Trash it: {trash_url}\n",
            content = record.content,
        ),
    }
}

/// Tells the submitter their listing is live and hands over the edit link.
pub fn published(
    site_name: &str,
    permalink: &str,
    edit_url: &str,
    contact_url: &str,
) -> Email {
    Email {
        subject: subject(site_name, "You are now listed"),
        body: format!(
            "Thank you for submitting yourself to {site_name}.\n\
             \n\
             Your listing is now live:\n\
             {permalink}\n\
             \n\
             To edit your listing at any time in the future, please visit:\n\
             {edit_url}\n\
             \n\
             Keep this email for your records.\n\
             \n\
             If you have any questions, please contact me:\n\
             {contact_url}\n"
        ),
    }
}
