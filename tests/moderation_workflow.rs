// End-to-end lifecycle tests driven through the emails a real user and
// operator would receive, using only the public API.

use sourcedesk::{
    MemoryMailer, MemoryStore, ModerationAction, NewSource, SiteLinks, SourceDesk, SourceStatus,
    SourcedeskConfig,
};

fn desk() -> SourceDesk<MemoryStore, MemoryMailer, SiteLinks> {
    let mut config = SourcedeskConfig::default();
    config.site.name = "Science Sources".to_string();
    config.site.base_url = "https://sources.x.test".to_string();
    config.operator.email = "ops@x.test".to_string();
    let links = SiteLinks::new(&config.site.base_url, &config.site.contact_path);
    SourceDesk::new(config, MemoryStore::new(), MemoryMailer::new(), links)
}

/// Pull a query parameter value out of the first link in a mail body that
/// carries it, the way a recipient clicking the link would.
fn param_from_body(body: &str, param: &str) -> String {
    let needle = format!("{param}=");
    let start = body.find(&needle).expect("parameter present in body") + needle.len();
    body[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[test]
fn full_lifecycle_submit_confirm_publish_edit() {
    let desk = desk();

    // Jane submits herself
    let record = desk
        .submit(NewSource {
            name: "Jane Doe".to_string(),
            email: "jane@x.test".to_string(),
            content: "bio".to_string(),
        })
        .unwrap();
    assert_eq!(record.status, SourceStatus::Draft);
    assert_eq!(record.status.label(), "Awaiting Email Confirmation");

    // She clicks the link from the confirmation email
    let confirm_mail = desk.mailer().last().unwrap();
    assert_eq!(confirm_mail.to, "jane@x.test");
    let confirm_token = param_from_body(&confirm_mail.body, "key");
    assert!(desk.confirm_email(record.id, &confirm_token).unwrap());
    assert_eq!(
        desk.record(record.id).unwrap().status,
        SourceStatus::Pending
    );
    assert_eq!(
        desk.record(record.id).unwrap().status.label(),
        "Needs Moderation"
    );

    // The operator clicks the publish link from the moderation email
    let moderation_mail = desk.mailer().last().unwrap();
    assert_eq!(moderation_mail.to, "ops@x.test");
    let admin_token = param_from_body(&moderation_mail.body, "nonce");
    assert!(desk
        .moderate(record.id, ModerationAction::Publish, &admin_token)
        .unwrap());
    assert_eq!(
        desk.record(record.id).unwrap().status,
        SourceStatus::Published
    );

    // Jane gets the listing-live email and uses her edit link
    let published_mail = desk.mailer().last().unwrap();
    assert_eq!(published_mail.to, "jane@x.test");
    assert!(published_mail
        .body
        .contains(&format!("sources/{}", record.id)));
    let edit_token = param_from_body(&published_mail.body, "edit");
    assert!(desk.request_edit(record.id, &edit_token).unwrap());
    assert!(!desk.request_edit(record.id, "wrong").unwrap());

    // Three emails total: confirmation, moderation, listing-live
    assert_eq!(desk.mailer().sent_count(), 3);
}

#[test]
fn stale_publish_link_cannot_republish_or_resend() {
    let desk = desk();

    let record = desk
        .submit(NewSource {
            name: "Jane Doe".to_string(),
            email: "jane@x.test".to_string(),
            content: "bio".to_string(),
        })
        .unwrap();
    let confirm_token = param_from_body(&desk.mailer().last().unwrap().body, "key");
    desk.confirm_email(record.id, &confirm_token).unwrap();
    let admin_token = param_from_body(&desk.mailer().last().unwrap().body, "nonce");

    assert!(desk
        .moderate(record.id, ModerationAction::Publish, &admin_token)
        .unwrap());
    let sent_after_publish = desk.mailer().sent_count();

    // Clicking the emailed publish link a second time
    assert!(!desk
        .moderate(record.id, ModerationAction::Publish, &admin_token)
        .unwrap());
    assert_eq!(desk.mailer().sent_count(), sent_after_publish);
    assert_eq!(
        desk.record(record.id).unwrap().status,
        SourceStatus::Published
    );
}

#[test]
fn trashed_submission_goes_quietly() {
    let desk = desk();

    let record = desk
        .submit(NewSource {
            name: "Spam Bot".to_string(),
            email: "spam@x.test".to_string(),
            content: "buy things".to_string(),
        })
        .unwrap();
    let confirm_token = param_from_body(&desk.mailer().last().unwrap().body, "key");
    desk.confirm_email(record.id, &confirm_token).unwrap();
    let admin_token = param_from_body(&desk.mailer().last().unwrap().body, "nonce");
    let sent_before = desk.mailer().sent_count();

    assert!(desk
        .moderate(record.id, ModerationAction::Trash, &admin_token)
        .unwrap());
    assert_eq!(
        desk.record(record.id).unwrap().status,
        SourceStatus::Trashed
    );
    // Trash sends no email, and the moderation queue is empty again
    assert_eq!(desk.mailer().sent_count(), sent_before);
    assert!(desk.moderation_queue().unwrap().is_empty());
}
