use pretty_assertions::assert_eq;
use quill_ir::Name;

use super::*;

fn name(text: &str) -> Name {
    Name::from(text)
}

#[test]
fn test_locals_get_consecutive_slots() {
    let scope = Scope::root(false).with_local(name("a")).with_local(name("b"));
    assert_eq!(scope.resolve(&name("a")), Some(Binding::Local(0)));
    assert_eq!(scope.resolve(&name("b")), Some(Binding::Local(1)));
    assert_eq!(scope.frame_len(), 2);
    assert_eq!(scope.resolve(&name("c")), None);
}

#[test]
fn test_extension_does_not_affect_siblings() {
    let base = Scope::root(false).with_local(name("a"));
    let left = base.with_local(name("x"));
    let right = base.with_local(name("y"));
    assert!(left.is_local(&name("x")));
    assert!(!right.is_local(&name("x")));
    assert!(!base.is_local(&name("x")));
    assert_eq!(right.resolve(&name("y")), Some(Binding::Local(1)));
}

#[test]
fn test_closure_scope_resolution_order() {
    let outer = Scope::root(true).with_local(name("s"));
    let inner = outer.closure(&[name("s"), name("t")], Some(name("f")));
    assert_eq!(inner.resolve(&name("s")), Some(Binding::Capture(0)));
    assert_eq!(inner.resolve(&name("t")), Some(Binding::Capture(1)));
    assert_eq!(inner.resolve(&name("f")), Some(Binding::Recursive));
    assert!(inner.implicit_record());
    assert_eq!(inner.frame_len(), 0);

    // A parameter shadows both the capture and the self name.
    let shadowed = inner.with_local(name("s")).with_local(name("f"));
    assert_eq!(shadowed.resolve(&name("s")), Some(Binding::Local(0)));
    assert_eq!(shadowed.resolve(&name("f")), Some(Binding::Local(1)));
}
