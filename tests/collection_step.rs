use pretty_assertions::assert_eq;
use std::any::Any;
use structural_equivalency::{
    check_equivalent, find_sequence_capabilities, is_collection, is_sequence, node_by_eq,
    single_element_type, AssertionScope, Context, EquivalencyError, EquivalencyOptions,
    EquivalencyStep, EquivalencyValidator, GenericEnumerableStep, Node, NodePath,
    SequenceCapability, SequenceOf, TypeCategory, TypeInfo, TypeTag,
};

#[derive(Debug, Clone, PartialEq)]
struct Dog {
    name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
struct Animal {
    species: &'static str,
}

node_by_eq!(Dog, Animal);

/// Iterable as dogs only, without an untyped element view.
#[derive(Debug)]
struct Pack {
    dogs: Vec<Dog>,
}

impl SequenceOf<Dog> for Pack {
    fn items(&self) -> Vec<&Dog> {
        self.dogs.iter().collect()
    }
}

impl Node for Pack {
    fn runtime_type(&self) -> TypeInfo {
        Self::static_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::object::<Self>().with_capability(SequenceCapability::of::<Self, Dog>())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, _other: &dyn Node) -> bool {
        false
    }
}

/// Iterable both as dogs and as animals.
#[derive(Debug)]
struct Kennel {
    dogs: Vec<Dog>,
    animals: Vec<Animal>,
}

impl SequenceOf<Dog> for Kennel {
    fn items(&self) -> Vec<&Dog> {
        self.dogs.iter().collect()
    }
}

impl SequenceOf<Animal> for Kennel {
    fn items(&self) -> Vec<&Animal> {
        self.animals.iter().collect()
    }
}

impl Node for Kennel {
    fn runtime_type(&self) -> TypeInfo {
        Self::static_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::object::<Self>()
            .with_capability(SequenceCapability::of::<Self, Dog>())
            .with_capability(SequenceCapability::of::<Self, Animal>())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, _other: &dyn Node) -> bool {
        false
    }
}

/// Text that also iterates its characters.
#[derive(Debug)]
struct Word(Vec<char>);

impl SequenceOf<char> for Word {
    fn items(&self) -> Vec<&char> {
        self.0.iter().collect()
    }
}

impl Node for Word {
    fn runtime_type(&self) -> TypeInfo {
        Self::static_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::of::<Self>(TypeCategory::Text)
            .with_capability(SequenceCapability::of::<Self, char>())
            .with_untyped_elements()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, _other: &dyn Node) -> bool {
        false
    }
}

fn rex() -> Dog {
    Dog { name: "Rex" }
}

fn fido() -> Dog {
    Dog { name: "Fido" }
}

fn failures<S: Node, E: Node>(
    subject: &S,
    expectation: &E,
    options: &EquivalencyOptions,
) -> Vec<String> {
    match check_equivalent(subject, expectation, options) {
        Ok(()) => Vec::new(),
        Err(EquivalencyError::AssertionFailed(failures)) => {
            failures.0.into_iter().map(|failure| failure.message).collect()
        }
        Err(other) => panic!("unexpected fault: {other}"),
    }
}

#[test]
fn single_capability_yields_its_element_type() {
    let ty = <Vec<i64> as Node>::static_type();
    assert!(is_sequence(&ty));
    assert_eq!(single_element_type(&ty).unwrap(), TypeTag::of::<i64>());

    let ty = Pack::static_type();
    assert!(is_sequence(&ty));
    assert!(is_collection(&ty));
    assert_eq!(single_element_type(&ty).unwrap(), TypeTag::of::<Dog>());
}

#[test]
fn several_capabilities_are_not_a_single_element_type() {
    let ty = Kennel::static_type();
    assert!(is_sequence(&ty));
    assert_eq!(find_sequence_capabilities(&ty).len(), 2);
    assert!(matches!(
        single_element_type(&ty),
        Err(EquivalencyError::NotSingleSequence { count: 2, .. })
    ));
}

#[test]
fn duplicate_capabilities_collapse() {
    let ty = TypeInfo::object::<Pack>()
        .with_capability(SequenceCapability::of::<Pack, Dog>())
        .with_capability(SequenceCapability::of::<Pack, Dog>());
    assert_eq!(ty.declared_capabilities().len(), 2);
    assert_eq!(find_sequence_capabilities(&ty).len(), 1);
}

#[test]
fn text_is_never_a_sequence() {
    let types = [
        <String as Node>::static_type(),
        <&'static str as Node>::static_type(),
        Word::static_type(),
    ];
    for ty in types {
        assert!(!is_sequence(&ty), "{ty} classified as a sequence");
        assert!(!is_collection(&ty), "{ty} classified as a collection");
        assert!(find_sequence_capabilities(&ty).is_empty());
    }
}

#[test]
fn scalars_are_rejected_without_inspection() {
    let ty = TypeInfo::of::<Pack>(TypeCategory::Integer)
        .with_capability(SequenceCapability::of::<Pack, Dog>());
    assert!(find_sequence_capabilities(&ty).is_empty());
}

#[test]
fn ambiguous_expectation_is_reported_not_guessed() {
    let kennel = Kennel {
        dogs: vec![rex()],
        animals: vec![Animal { species: "cat" }],
    };
    let subject = vec![rex()];
    assert_eq!(
        failures(&subject, &kennel, &EquivalencyOptions::default()),
        vec!["expectation implements [SequenceOf<Dog>, SequenceOf<Animal>], so cannot determine which one to use for asserting the equivalency of the collection."]
    );
}

#[test]
fn ambiguity_is_reported_even_for_matching_subjects() {
    let kennel = Kennel {
        dogs: vec![rex()],
        animals: vec![],
    };
    let subject = Kennel {
        dogs: vec![rex()],
        animals: vec![],
    };
    assert_eq!(failures(&subject, &kennel, &EquivalencyOptions::default()).len(), 1);
}

#[test]
fn subject_with_several_capabilities_is_not_a_collection() {
    let subject = Kennel {
        dogs: vec![rex()],
        animals: vec![Animal { species: "cat" }],
    };
    let expectation = vec![Animal { species: "cat" }];
    assert_eq!(
        failures(&subject, &expectation, &EquivalencyOptions::default()),
        vec!["Expected subject to be a collection, but it was a Kennel."]
    );
}

#[test]
fn absent_subject_is_reported() {
    let expectation = vec![1_i32, 2];
    let validator = EquivalencyValidator::new(EquivalencyOptions::default());
    let context = Context::new(
        None,
        Some(&expectation as &dyn Node),
        <Vec<i32> as Node>::static_type(),
        NodePath::root(),
    );
    let mut scope = AssertionScope::new();
    validator.assert_equality_using(&mut scope, &context).unwrap();
    let messages: Vec<_> = scope.into_failures().into_iter().map(|f| f.message).collect();
    assert_eq!(messages, vec!["Expected subject not to be <null>."]);
}

#[test]
fn scalar_subject_is_reported_with_its_type() {
    assert_eq!(
        failures(&42_i64, &vec![1_i64], &EquivalencyOptions::default()),
        vec!["Expected subject to be a collection, but it was a i64."]
    );
    assert_eq!(
        failures(&String::from("abc"), &vec!['a', 'b', 'c'], &EquivalencyOptions::default()),
        vec!["Expected subject to be a collection, but it was a String."]
    );
}

#[test]
fn ordering_rules_decide_permutations() {
    let strict = EquivalencyOptions::default().with_strict_ordering();
    let any = EquivalencyOptions::default().without_strict_ordering();

    assert!(failures(&vec![1, 2, 3], &vec![1, 2, 3], &strict).is_empty());
    assert_eq!(
        failures(&vec![3, 2, 1], &vec![1, 2, 3], &strict),
        vec![
            "Expected subject[0] to be 1, but found 3.",
            "Expected subject[2] to be 3, but found 1.",
        ]
    );
    assert!(failures(&vec![3, 2, 1], &vec![1, 2, 3], &any).is_empty());
}

#[test]
fn count_mismatch_stops_item_comparison() {
    assert_eq!(
        failures(&vec![1, 2], &vec![1, 2, 3], &EquivalencyOptions::default()),
        vec!["Expected subject to be a collection with 3 item(s), but [1, 2] contains 1 item(s) less than [1, 2, 3]."]
    );
    assert_eq!(
        failures(&vec![1, 2, 3, 4], &vec![1, 2], &EquivalencyOptions::default()),
        vec!["Expected subject to be a collection with 2 item(s), but [1, 2, 3, 4] contains 2 item(s) more than [1, 2]."]
    );
}

#[test]
fn unmatched_item_reports_closest_candidate() {
    assert_eq!(
        failures(&vec![1, 2, 4], &vec![1, 2, 3], &EquivalencyOptions::default()),
        vec!["Expected subject[2] to be 3, but found 4."]
    );
}

#[test]
fn nested_collections_are_dispatched_again() {
    let subject = vec![vec![2, 1], vec![3, 4]];
    let expectation = vec![vec![1, 2], vec![3, 4]];
    assert!(failures(&subject, &expectation, &EquivalencyOptions::default()).is_empty());
    assert_eq!(
        failures(&subject, &expectation, &EquivalencyOptions::default().with_strict_ordering()),
        vec![
            "Expected subject[0][0] to be 1, but found 2.",
            "Expected subject[0][1] to be 2, but found 1.",
        ]
    );
}

#[test]
fn strict_ordering_can_target_one_path() {
    let subject = vec![vec![2, 1], vec![4, 3]];
    let expectation = vec![vec![1, 2], vec![3, 4]];
    let options = EquivalencyOptions::default()
        .with_strict_ordering()
        .without_strict_ordering_for("[0]");
    assert_eq!(
        failures(&subject, &expectation, &options),
        vec![
            "Expected subject[1][0] to be 3, but found 4.",
            "Expected subject[1][1] to be 4, but found 3.",
        ]
    );
}

#[test]
fn non_recursive_nested_items_use_plain_equality() {
    let subject = vec![vec![vec![2, 1]]];
    let expectation = vec![vec![vec![1, 2]]];
    assert!(failures(&subject, &expectation, &EquivalencyOptions::default()).is_empty());
    assert_eq!(
        failures(&subject, &expectation, &EquivalencyOptions::default().excluding_nested_objects()),
        vec!["Expected subject[0][0] to be [1, 2], but found [2, 1]."]
    );
}

#[test]
fn typed_capability_subject_is_materialized() {
    let subject = Pack {
        dogs: vec![fido(), rex()],
    };
    let expectation = vec![rex(), fido()];
    assert!(failures(&subject, &expectation, &EquivalencyOptions::default()).is_empty());

    let expectation = Pack {
        dogs: vec![rex(), fido()],
    };
    let subject = vec![rex(), rex()];
    assert_eq!(
        failures(&subject, &expectation, &EquivalencyOptions::default()),
        vec![r#"Expected subject[1] to be Dog { name: "Fido" }, but found Dog { name: "Rex" }."#]
    );
}

#[test]
fn boxed_expectation_follows_the_resolution_policy() {
    let subject: Box<dyn Node> = Box::new(vec![1, 2, 3]);
    let expectation: Box<dyn Node> = Box::new(vec![3, 2, 1]);

    let runtime = EquivalencyOptions::default().respecting_runtime_types();
    assert!(failures(&subject, &expectation, &runtime).is_empty());

    // Declared type is `dyn Node`: the collection step declines and plain
    // equality decides.
    let declared = EquivalencyOptions::default().respecting_declared_types();
    assert_eq!(
        failures(&subject, &expectation, &declared),
        vec!["Expected subject to be [3, 2, 1], but found [1, 2, 3]."]
    );

    let context = Context::root(&subject, &expectation);
    assert!(GenericEnumerableStep.can_handle(&context, &runtime));
    assert!(!GenericEnumerableStep.can_handle(&context, &declared));

    let (left, right) = (vec![1, 2], vec![2, 1]);
    let opaque = Context::root_dyn(Some(&left as &dyn Node), Some(&right as &dyn Node));
    assert!(GenericEnumerableStep.can_handle(&opaque, &runtime));
    assert!(!GenericEnumerableStep.can_handle(&opaque, &declared));
}

#[test]
fn declared_policy_still_dispatches_statically_known_sequences() {
    let declared = EquivalencyOptions::default().respecting_declared_types();
    assert!(failures(&vec![3, 2, 1], &vec![1, 2, 3], &declared).is_empty());
}

#[test]
fn heterogeneous_items_keep_their_runtime_types() {
    let subject: Vec<Box<dyn Node>> = vec![Box::new(vec![2, 1]), Box::new(String::from("x"))];
    let expectation: Vec<Box<dyn Node>> = vec![Box::new(vec![1, 2]), Box::new(String::from("x"))];
    assert!(failures(&subject, &expectation, &EquivalencyOptions::default()).is_empty());

    let mismatched: Vec<Box<dyn Node>> = vec![Box::new(vec![1, 2]), Box::new(String::from("y"))];
    assert_eq!(
        failures(&mismatched, &expectation, &EquivalencyOptions::default().with_strict_ordering()),
        vec![r#"Expected subject[1] to be "x", but "y" differs near "y" (index 0)."#]
    );
}

#[test]
fn recursion_depth_is_bounded() {
    let subject = vec![vec![vec![1]]];
    let options = EquivalencyOptions::default().with_max_recursion_depth(Some(1));
    assert_eq!(
        failures(&subject, &subject.clone(), &options),
        vec!["The maximum recursion depth of 1 was reached at subject[0][0]."]
    );
}

#[test]
#[should_panic(expected = "Expected subject[2] to be 3, but found 1.")]
fn assert_macro_panics_with_failures() {
    structural_equivalency::assert_equivalent!(
        vec![3, 2, 1],
        vec![1, 2, 3],
        &EquivalencyOptions::default().with_strict_ordering()
    );
}
