use alloc::{rc::Rc, vec::Vec};

use rstest::rstest;

use super::*;
use crate::langs;

#[test]
fn ids_follow_first_use() {
    let registry = LanguageRegistry::builtin();
    let html = registry.require("html").unwrap();
    let el = registry.require("el").unwrap();
    let source = registry.require("source").unwrap();
    assert_eq!(html.assigned_id(), None);

    assert_eq!(registry.id(&html), LanguageId(1));
    assert_eq!(registry.id(&el), LanguageId(2));
    assert_eq!(registry.ids().id(None), LanguageId::NULL);
    assert_eq!(registry.id(&source), LanguageId(3));
    assert_eq!(registry.id(&html), LanguageId(1));
    assert_eq!(registry.id(&el), LanguageId(2));
    assert_eq!(el.assigned_id(), Some(LanguageId(2)));

    // A second registry assigns its own ids.
    let other = LanguageRegistry::builtin();
    assert_eq!(other.id(&other.require("el").unwrap()), LanguageId(1));
}

#[test]
fn sets_are_canonical() {
    let registry = LanguageRegistry::builtin();
    let ids = registry.ids();
    let a = registry.require("source").unwrap();
    let b = registry.require("javadoc").unwrap();
    let c = registry.require("html").unwrap();

    let ab = ids.get_with(&ids.get(Some(&a)), Some(&b));
    let abc = ids.get_with(&ab, Some(&c));
    assert_eq!(ab.ids(), [LanguageId(1), LanguageId(2)]);
    assert!(LanguageIdSet::ptr_eq(&ids.from_ids(ab.ids()), &ab));
    assert!(LanguageIdSet::ptr_eq(&ids.get_removed(&abc, Some(&c)), &ab));
    assert!(LanguageIdSet::ptr_eq(&ids.get_with(&ab, Some(&a)), &ab));
    assert!(LanguageIdSet::ptr_eq(&ids.get_removed(&ab, Some(&c)), &ab));

    // Removal from the middle is rebuilt through the trie.
    let ac = ids.get_removed(&abc, Some(&b));
    assert_eq!(ac.ids(), [LanguageId(1), LanguageId(3)]);
    assert!(LanguageIdSet::ptr_eq(&ac, &ids.get_with(&ids.get(Some(&a)), Some(&c))));
    assert!(LanguageIdSet::ptr_eq(&ids.get_removed(&abc, Some(&b)), &ac));

    // Order matters.
    let ba = ids.get_with(&ids.get(Some(&b)), Some(&a));
    assert_ne!(ba, ab);
    assert_eq!(ba.len(), 2);
}

#[test]
fn null_language_is_a_member_like_any_other() {
    let registry = LanguageRegistry::builtin();
    let ids = registry.ids();
    let el = registry.require("el").unwrap();
    let html = registry.require("html").unwrap();

    let set = ids.get_with(&ids.get(None), Some(&el));
    assert_eq!(set.ids(), [LanguageId::NULL, LanguageId(1)]);
    assert!(set.contains_language(None));
    assert!(set.contains_language(Some(&el)));
    assert!(!set.contains_language(Some(&html)));
    // Checking membership does not assign an id.
    assert_eq!(html.assigned_id(), None);

    let without = ids.get_removed(&set, None);
    assert!(LanguageIdSet::ptr_eq(&without, &ids.get(Some(&el))));
    assert!(ids.empty().is_empty());
}

#[test]
fn unused_sets_are_rebuilt() {
    let ids = LanguageIds::new();
    let first = ids.from_ids(&[LanguageId(7), LanguageId(9)]);
    let address = first.as_ptr();
    let again = ids.from_ids(&[LanguageId(7), LanguageId(9)]);
    assert_eq!(again.as_ptr(), address);
    drop((first, again));
    let rebuilt = ids.from_ids(&[LanguageId(7), LanguageId(9)]);
    assert_eq!(rebuilt.ids(), [LanguageId(7), LanguageId(9)]);
}

#[test]
fn plain_and_suppressed_wraps_are_memoised() {
    let registry = LanguageRegistry::builtin();
    let el = registry.require("el").unwrap();
    let kind = langs::el::ElToken::Identifier.ordinal();

    let plain = el.wrap(kind, &WrapContext::Plain);
    assert!(WrapTokenId::ptr_eq(&plain, &el.wrap(kind, &WrapContext::Plain)));
    assert_eq!(plain.id.name(), "IDENTIFIER");

    let suppressed = el.wrap(kind, &WrapContext::NoDefaultEmbedding);
    assert!(WrapTokenId::ptr_eq(
        &suppressed,
        &el.wrap(kind, &WrapContext::NoDefaultEmbedding)
    ));
    assert!(!WrapTokenId::ptr_eq(&plain, &suppressed));
    assert_eq!(plain.id, suppressed.id);
}

#[test]
fn embedded_wraps_use_a_small_lru() {
    let registry = LanguageRegistry::builtin();
    let ids = registry.ids();
    let el = registry.require("el").unwrap();
    let kind = langs::el::ElToken::Identifier.ordinal();

    let sets: Vec<LanguageIdSet> = (1..=5).map(|i| ids.from_ids(&[LanguageId(i)])).collect();
    let wrap = |i: usize| el.wrap(kind, &WrapContext::Embedded(sets[i].clone()));

    let first: Vec<Rc<WrapTokenId>> = (0..4).map(wrap).collect();
    for (i, w) in first.iter().enumerate() {
        assert!(WrapTokenId::ptr_eq(w, &wrap(i)));
    }

    // Touch S1 so that S2 becomes the least recently used line.
    assert!(WrapTokenId::ptr_eq(&first[0], &wrap(0)));
    let fifth = wrap(4);
    assert!(WrapTokenId::ptr_eq(&fifth, &wrap(4)));

    let s2 = wrap(1);
    assert!(!WrapTokenId::ptr_eq(&first[1], &s2));
    assert_eq!(*first[1], *s2);
    assert!(WrapTokenId::ptr_eq(&first[0], &wrap(0)));
}

#[test]
fn embedded_wraps_are_per_kind() {
    let registry = LanguageRegistry::builtin();
    let el = registry.require("el").unwrap();
    let context = WrapContext::Embedded(registry.ids().from_ids(&[LanguageId(1)]));
    let ident = el.wrap(langs::el::ElToken::Identifier.ordinal(), &context);
    let dot = el.wrap(langs::el::ElToken::Dot.ordinal(), &context);
    assert_ne!(ident.id, dot.id);
    assert!(WrapTokenId::ptr_eq(
        &dot,
        &el.wrap(langs::el::ElToken::Dot.ordinal(), &context)
    ));
}

#[rstest]
#[case(&["template"], 0)]
#[case(&["template", "el"], 1)]
#[case(&["source", "javadoc", "html"], 2)]
fn context_holds_enclosing_languages(#[case] names: &[&str], #[case] outer: usize) {
    let registry = LanguageRegistry::builtin();
    let path = registry.path(names).unwrap();
    match registry.context_of(&path) {
        WrapContext::Plain => assert_eq!(outer, 0),
        WrapContext::Embedded(set) => {
            assert_eq!(set.len(), outer);
            let expected = path.languages()[..outer]
                .iter()
                .map(|l| registry.id(l))
                .collect::<Vec<_>>();
            assert!(LanguageIdSet::ptr_eq(&set, &registry.ids().from_ids(&expected)));
        }
        WrapContext::NoDefaultEmbedding => unreachable!(),
    }
}

#[test]
fn registry_errors() {
    let mut registry = LanguageRegistry::builtin();
    assert_eq!(
        registry.register(langs::EL).unwrap_err(),
        RegistryError::DuplicateLanguage("el")
    );
    assert_eq!(
        registry.path(&["source", "python"]).unwrap_err(),
        RegistryError::UnknownLanguage("python".into())
    );
    assert_eq!(registry.path(&[]).unwrap_err(), RegistryError::EmptyPath);
    assert_eq!(registry.languages().len(), 5);
}

#[test]
fn paths() {
    let registry = LanguageRegistry::builtin();
    let path = registry.path(&["source", "javadoc", "html"]).unwrap();
    assert_eq!(path.top().name(), "source");
    assert_eq!(path.innermost().name(), "html");
    let prefix = registry.path(&["source", "javadoc"]).unwrap();
    assert!(path.starts_with(&prefix));
    assert!(!prefix.starts_with(&path));
    assert_eq!(prefix.embedded(&registry.require("html").unwrap()), path);
}

#[test]
fn token_lookup_by_name() {
    let registry = LanguageRegistry::builtin();
    let html = registry.require("html").unwrap();
    let id = html.token_by_name("TAG_OPEN").unwrap();
    assert_eq!(id, html.token_id(id.ordinal));
    assert_eq!(id.category(), TokenCategory::Tag);
    assert!(html.token_by_name("NOPE").is_none());
    assert_eq!(html.token_count(), langs::html::HtmlToken::TOKENS.len());
}
