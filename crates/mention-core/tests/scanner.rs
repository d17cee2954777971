use mention_core::{ScanOptions, TriggerContext, scan, scan_with};

#[test]
fn test_trigger_active_at_end_of_partial_name() {
    let ctx = scan("ask @An", 7);
    assert!(ctx.active);
    assert_eq!(ctx.query, "An");
    assert_eq!(ctx.start_offset, 4);
}

#[test]
fn test_trigger_terminated_by_space_then_word() {
    let ctx = scan("ask @An please", 12);
    assert!(!ctx.active);
}

#[test]
fn test_trailing_space_keeps_trigger_and_is_trimmed() {
    let ctx = scan("ask @An ", 8);
    assert!(ctx.active);
    assert_eq!(ctx.query, "An");
}

#[test]
fn test_only_text_before_caret_matters() {
    // Caret in the middle of "@Anabel": the chars after it are ignored.
    let ctx = scan("hi @Anabel", 6);
    assert!(ctx.active);
    assert_eq!(ctx.query, "An");
    assert_eq!(ctx.start_offset, 3);
}

#[test]
fn test_no_at_before_caret() {
    assert_eq!(scan("plain text", 5), TriggerContext::inactive());
    assert!(!scan("", 0).active);
    assert!(!scan("@Ana", 0).active);
}

#[test]
fn test_line_break_deactivates() {
    assert!(!scan("@Ana\nBob", 8).active);
}

#[test]
fn test_digits_and_punctuation_deactivate() {
    assert!(!scan("@ana1", 5).active);
    assert!(!scan("@ana.b", 6).active);
    assert!(!scan("@@", 2).active);
    assert!(!scan("mail @@ana", 10).active);
}

#[test]
fn test_accented_letters_are_allowed() {
    let ctx = scan("cc @Élo", 7);
    assert!(ctx.active);
    assert_eq!(ctx.query, "Élo");

    let ctx = scan("cc @Çağ", 7);
    assert!(ctx.active);
    assert_eq!(ctx.query, "Çağ");
}

#[test]
fn test_offsets_are_chars_not_bytes() {
    // '👋' is one char but four bytes.
    let ctx = scan("👋 @Jo", 5);
    assert!(ctx.active);
    assert_eq!(ctx.start_offset, 2);
    assert_eq!(ctx.query, "Jo");
}

#[test]
fn test_nearest_at_wins() {
    let ctx = scan("@Ana @Bo", 8);
    assert!(ctx.active);
    assert_eq!(ctx.start_offset, 5);
    assert_eq!(ctx.query, "Bo");
}

#[test]
fn test_multi_word_queries_when_allowed() {
    let options = ScanOptions {
        max_query_words: 2,
        ..ScanOptions::default()
    };
    let ctx = scan_with("cc @Ana Sou", 11, &options);
    assert!(ctx.active);
    assert_eq!(ctx.query, "Ana Sou");

    assert!(!scan_with("cc @Ana Souza x", 15, &options).active);
}

#[test]
fn test_word_boundary_option_ignores_email_addresses() {
    let options = ScanOptions {
        require_word_boundary: true,
        ..ScanOptions::default()
    };
    assert!(!scan_with("mail ana@corp", 13, &options).active);
    assert!(scan_with("mail (@corp", 11, &options).active);
    assert!(scan_with("@corp", 5, &options).active);

    // Without the option the address reads as a trigger.
    assert!(scan("mail ana@corp", 13).active);
}
