use idiomaster_core::{simulate_translation, Catalog, TranslationError, SIMULATED_CONFIDENCE};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn blank_input_is_rejected() {
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        simulate_translation("   ", &catalog, &mut rng),
        Err(TranslationError::EmptyInput)
    ));
    assert_eq!(
        TranslationError::EmptyInput.to_string(),
        "please enter some text to translate"
    );
}

#[test]
fn result_carries_the_input_and_a_catalog_idiom() {
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(2);
    let result = simulate_translation("猫の手も借りたいほど忙しい", &catalog, &mut rng).unwrap();
    assert_eq!(result.original_text, "猫の手も借りたいほど忙しい");
    assert!(!result.translated_text.is_empty());
    assert_eq!(result.confidence, SIMULATED_CONFIDENCE);
    assert!(catalog.iter().any(|i| i.title == result.matching_idiom));
}
