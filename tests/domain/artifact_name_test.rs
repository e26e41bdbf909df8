use semporna::domain::ArtifactName;

#[test]
fn given_original_name_when_generating_then_name_carries_tag_and_extension() {
    let name = ArtifactName::generate("audio_file", "My Recording.WAV");

    assert!(name.as_str().starts_with("audio_file-"));
    assert!(name.as_str().ends_with(".wav"));
}

#[test]
fn given_name_without_extension_when_generating_then_no_trailing_dot() {
    let name = ArtifactName::generate("audio_file", "recording");

    assert!(!name.as_str().contains('.'));
}

#[test]
fn given_suspicious_extension_when_generating_then_extension_is_dropped() {
    let name = ArtifactName::generate("audio_file", "weird.wa/v");

    assert!(!name.as_str().contains('/'));
    assert!(!name.as_str().contains('.'));
}

#[test]
fn given_same_original_name_when_generating_twice_then_names_differ() {
    let first = ArtifactName::generate("audio_file", "sample.wav");
    let second = ArtifactName::generate("audio_file", "sample.wav");

    assert_ne!(first, second);
}

#[test]
fn given_generated_name_when_parsing_then_accepted() {
    let generated = ArtifactName::generate("audio_file", "sample.wav");

    assert!(ArtifactName::parse(generated.as_str()).is_some());
}

#[test]
fn given_traversal_attempts_when_parsing_then_rejected() {
    assert!(ArtifactName::parse("../secret.wav").is_none());
    assert!(ArtifactName::parse("a/../../b.wav").is_none());
    assert!(ArtifactName::parse("nested/path.wav").is_none());
    assert!(ArtifactName::parse("back\\slash.wav").is_none());
    assert!(ArtifactName::parse(".hidden").is_none());
    assert!(ArtifactName::parse("").is_none());
}
