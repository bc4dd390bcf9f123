use crate::*;
use core::ops::Range;
use std::collections::BTreeSet;

fn usize_stream(seed: u64, bounds: Range<usize>) -> impl Iterator<Item = usize> {
    let rng = fastrand::Rng::with_seed(seed);
    std::iter::repeat_with(move || rng.usize(bounds.clone()))
}

fn paramd_usize_stream() -> impl Iterator<Item = usize> {
    usize_stream(SEED, BOUNDS.clone()).take(COUNT)
}

const BOUNDS: Range<usize> = 0..150;
const COUNT: usize = 90;
const SEED: u64 = 3;

fn basic() -> EnumType {
    EnumType::declare(
        "EnumBasic",
        [
            ("ONE", Scalar::Int(1)),
            ("TWO", Scalar::Int(2)),
            ("THREE", Scalar::Int(3)),
            ("FOUR", Scalar::Int(4)),
            ("FIVE", Scalar::Int(5)),
            ("SIX", Scalar::Int(6)),
            ("SEVEN", Scalar::Int(7)),
            ("EIGHT", Scalar::Int(8)),
            ("NINE", Scalar::Int(9)),
            ("FLOAT", Scalar::Float(0.123)),
            ("STR", Scalar::from("str")),
        ],
    )
    .unwrap()
}

fn abc() -> EnumType {
    EnumType::declare("Abc", [("A", 0), ("B", 1), ("C", 2)]).unwrap()
}

// more values than fit one chunk
fn wide() -> EnumType {
    EnumType::declare("Wide", BOUNDS.map(|i| (format!("V{i}"), i as i64))).unwrap()
}

fn ordinals_of(values: impl IntoIterator<Item = EnumValue>) -> Vec<Ordinal> {
    values.into_iter().map(|v| v.ordinal()).collect()
}

/// Walks the cursor from the start, collecting (key, ordinal) pairs.
fn walk<C: Cursor>(c: &mut C) -> Vec<(usize, Ordinal)> {
    let mut out = vec![];
    c.rewind();
    while c.valid() {
        let key = c.key();
        out.push((key, c.current().unwrap().ordinal()));
        c.next();
    }
    out
}

/////////////////////////////////////////////
// registry

#[test]
fn ordinals_are_dense() {
    let ty = basic();
    assert_eq!(ty.ordinal_count(), 11);
    for i in 0..ty.ordinal_count() {
        assert_eq!(ty.by_ordinal(i).unwrap().ordinal(), i);
    }
    assert!(matches!(
        ty.by_ordinal(11),
        Err(EnumError::OrdinalOutOfRange { ordinal: 11, count: 11, .. })
    ));
}

#[test]
fn ordinals_follow_declaration_order() {
    let ty = basic();
    let names: Vec<_> = ty.names().collect();
    assert_eq!(names[..3], ["ONE", "TWO", "THREE"]);
    assert_eq!(ty.get(1).unwrap().ordinal(), 0);
    assert_eq!(ty.get("str").unwrap().ordinal(), 10);
    assert_eq!(ty.declared_values().get_index(9).map(|(_, v)| v), Some(&Scalar::Float(0.123)));
}

#[test]
fn instances_are_singletons() {
    let ty = basic();
    let a = ty.get(2).unwrap();
    let b = ty.canonical_instance(Scalar::Int(2)).unwrap();
    let c = ty.by_name("TWO").unwrap();
    let d = ty.by_ordinal(1).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a, d);
    assert_eq!(ty.values()[1], a);
    // passing an instance back returns it unchanged
    assert_eq!(ty.canonical_instance(&a).unwrap(), a);
    assert_ne!(a, ty.get(3).unwrap());
}

#[test]
fn raw_values_compare_strictly() {
    let ty = basic();
    assert!(matches!(ty.get(1.0), Err(EnumError::InvalidValue { .. })));
    assert!(matches!(ty.get("1"), Err(EnumError::InvalidValue { .. })));
    assert!(matches!(ty.get(true), Err(EnumError::InvalidValue { .. })));
    assert!(ty.get(0.123).unwrap().is(0.123));
    assert!(!ty.get(1).unwrap().is(1.0));
}

#[test]
fn same_declaration_is_another_type() {
    let a = abc();
    let lookalike = abc();
    assert_ne!(a, lookalike);
    let err = a.canonical_instance(lookalike.get(0).unwrap()).unwrap_err();
    assert!(matches!(err, EnumError::TypeMismatch { .. }));
    assert_eq!(err.to_string(), "the given enum of type 'Abc' isn't same as the required type 'Abc'");
}

#[test]
fn ambiguous_declarations_are_rejected() {
    let err = EnumType::declare("Bad", [("A", 1), ("B", 2), ("C", 1)]).unwrap_err();
    match err {
        EnumError::AmbiguousValue { first, second, value, .. } => {
            assert_eq!((&*first, &*second, value), ("A", "C", Scalar::Int(1)));
        }
        other => panic!("unexpected {other:?}"),
    }
    let err = EnumType::declare("Bad", [("A", 1), ("A", 2)]).unwrap_err();
    assert!(matches!(err, EnumError::DuplicateName { .. }));
    // strict equality: these are three different raw values
    let ty = EnumType::declare("Mixed", [("I", Scalar::Int(1)), ("F", Scalar::Float(1.0)), ("T", Scalar::from("1"))]);
    assert_eq!(ty.unwrap().ordinal_count(), 3);
}

#[test]
fn unknown_names_are_rejected() {
    let ty = abc();
    assert!(matches!(ty.by_name("D"), Err(EnumError::InvalidName { .. })));
}

#[test]
fn value_formatting() {
    let ty = basic();
    let v = ty.get("str").unwrap();
    assert_eq!(v.to_string(), "STR");
    assert_eq!(format!("{v:?}"), "EnumBasic::STR(\"str\")");
    assert_eq!(v.type_name(), "EnumBasic");
    assert_eq!(v.enum_type_id(), ty.id());
}

#[test]
fn catalog_lookup() {
    let mut catalog = EnumCatalog::new();
    let ty = catalog.declare("Abc", [("A", 0), ("B", 1)]).unwrap();
    assert_eq!(catalog.get("abc").unwrap(), ty);
    assert!(catalog.contains("ABC"));
    assert_eq!(catalog.len(), 1);
    assert!(matches!(catalog.get("Nope"), Err(EnumError::UnsupportedType { .. })));
    assert!(matches!(EnumSet::from_catalog(&catalog, "Nope"), Err(EnumError::UnsupportedType { .. })));
    assert!(matches!(
        EnumList::from_catalog(&catalog, "Nope", ListFlags::empty()),
        Err(EnumError::UnsupportedType { .. })
    ));
    let set = EnumSet::from_catalog(&catalog, "ABC").unwrap();
    assert_eq!(set.enum_type(), &ty);
    // re-registering a name replaces the previous type
    let replaced = catalog.register(abc());
    assert_eq!(replaced, Some(ty));
}

/////////////////////////////////////////////
// index set

#[test]
fn index_set_count_matches_model() {
    let mut s = IndexSet::with_capacity(BOUNDS.end);
    let mut m = BTreeSet::new();
    for i in paramd_usize_stream() {
        assert_eq!(s.insert(i), m.insert(i));
    }
    assert_eq!(s.count_indexes(), m.len());
    assert!(s.iter_indexes().eq(m.iter().copied()));
    for i in usize_stream(SEED + 1, BOUNDS).take(COUNT) {
        assert_eq!(s.remove(i), m.remove(&i));
    }
    assert_eq!(s.count_indexes(), m.len());
    assert!(s.iter_indexes().eq(m.iter().copied()));
}

#[test]
fn next_index_from_matches_model() {
    let s = IndexSet::from_chunk_iter(BOUNDS.end, [0b1001, 0, 1 << 5]);
    let m: BTreeSet<usize> = s.iter_indexes().collect();
    assert_eq!(m.iter().copied().collect::<Vec<_>>(), [0, 3, 2 * usize::BITS as usize + 5]);
    for from in 0..BOUNDS.end + 10 {
        assert_eq!(s.next_index_from(from), m.range(from..).next().copied(), "from {from}");
    }
}

#[test]
fn index_set_keeps_within_capacity() {
    let mut s = IndexSet::with_capacity(3);
    s.fill();
    assert_eq!(s.count_indexes(), 3);
    let t = IndexSet::from_chunk_iter(3, [!0]);
    assert_eq!(s, t);
    assert_eq!(s.capacity(), ..3);
    assert_eq!(s.chunk_capacity(), 1);
    assert_eq!(s.as_chunks(), [0b111]);
    assert_eq!(format!("{}", s.display()), "{0, 1, 2}");
}

#[test]
fn index_set_order() {
    let a = IndexSet::from_chunk_iter(10, [0b011]);
    let b = IndexSet::from_chunk_iter(10, [0b111]);
    let c = IndexSet::from_chunk_iter(10, [0b100]);
    use core::cmp::Ordering::*;
    assert_eq!(a.index_cmp(&b), Some(Less));
    assert_eq!(b.index_cmp(&a), Some(Greater));
    assert_eq!(a.index_cmp(&a), Some(Equal));
    assert_eq!(a.index_cmp(&c), None);
}

/////////////////////////////////////////////
// enum set

#[test]
fn set_attach_is_idempotent() {
    let ty = basic();
    let mut set = EnumSet::new(ty.clone());
    assert!(set.attach(ty.get(1).unwrap()).unwrap());
    assert!(!set.attach(1).unwrap());
    assert_eq!(set.count(), 1);
    assert!(set.contains(1).unwrap());
    assert!(!set.contains(2).unwrap());
}

#[test]
fn set_detach() {
    let ty = basic();
    let mut set = EnumSet::new(ty.clone());
    set.attach(1).unwrap();
    set.attach("str").unwrap();
    assert!(set.detach(1).unwrap());
    assert!(!set.detach(1).unwrap());
    assert!(!set.detach(2).unwrap());
    assert!(!set.contains(1).unwrap());
    assert_eq!(set.count(), 1);
}

#[test]
fn set_rejects_foreign_and_undeclared() {
    let ty = abc();
    let mut set = EnumSet::new(ty);
    set.attach(0).unwrap();
    assert!(matches!(set.attach(7), Err(EnumError::InvalidValue { .. })));
    assert!(matches!(set.contains(abc().get(0).unwrap()), Err(EnumError::TypeMismatch { .. })));
    assert!(matches!(set.detach(basic().get(1).unwrap()), Err(EnumError::TypeMismatch { .. })));
    // nothing is attached when one value fails to resolve
    assert!(set.attach_all([Scalar::Int(1), Scalar::Int(9)]).is_err());
    assert_eq!(ordinals_of(&set), [0]);
}

#[test]
fn set_iterates_ascending() {
    let ty = wide();
    for seed in 0..8 {
        let mut set = EnumSet::new(ty.clone());
        let mut m = BTreeSet::new();
        for i in usize_stream(seed, BOUNDS).take(COUNT) {
            set.attach(i as i64).unwrap();
            m.insert(i);
        }
        assert_eq!(set.count(), m.len());
        let walked = walk(&mut set);
        let expected: Vec<_> = m.iter().map(|&o| (o, o)).collect();
        assert_eq!(walked, expected);
        assert_eq!(ordinals_of(&set), m.iter().copied().collect::<Vec<_>>());
    }
}

#[test]
fn set_skips_lazily() {
    let ty = abc();
    let mut set = EnumSet::new(ty.clone());
    set.attach("never").unwrap_err();
    set.attach(0).unwrap();
    set.attach(2).unwrap();

    set.rewind();
    assert_eq!(set.key(), 0);
    assert_eq!(set.current(), Some(ty.get(0).unwrap()));

    set.next();
    assert_eq!(set.current(), Some(ty.get(2).unwrap()));
    assert_eq!(set.key(), 2);

    set.next();
    assert!(!set.valid());
    assert_eq!(set.current(), None);
    assert_eq!(set.key(), 3);
}

#[test]
fn set_next_moves_one_ordinal() {
    let ty = basic();
    let mut set = EnumSet::new(ty);
    set.attach(1).unwrap();
    set.attach(5).unwrap();
    set.rewind();
    set.next();
    set.next();
    // cursor rests on ordinal 2 until a read skips it forward
    set.attach(3).unwrap();
    assert_eq!(set.key(), 2);
    set.detach(3).unwrap();
    assert!(set.valid());
    assert_eq!(set.key(), 4);
}

#[test]
fn set_valid_moves_the_cursor() {
    let ty = basic();
    let mut set = EnumSet::new(ty.clone());
    set.attach(4).unwrap();
    set.rewind();
    assert!(set.valid());
    // valid() already skipped to ordinal 3, attaching an earlier value does not pull it back
    set.attach(1).unwrap();
    assert_eq!(set.key(), 3);
    assert_eq!(set.current(), Some(ty.get(4).unwrap()));
}

#[test]
fn empty_set_is_invalid_from_the_start() {
    let mut set = EnumSet::new(basic());
    assert_eq!(set.count(), 0);
    assert!(set.is_empty());
    assert!(!set.valid());
    assert_eq!(set.key(), 0);
    assert_eq!(set.current(), None);
}

#[test]
fn set_rewinds_after_exhaustion() {
    let ty = basic();
    let mut set = EnumSet::new(ty.clone());
    set.attach_all([2, 9]).unwrap();
    assert_eq!(walk(&mut set), [(1, 1), (8, 8)]);
    assert!(!set.valid());
    set.rewind();
    assert_eq!(set.current(), Some(ty.get(2).unwrap()));
}

#[test]
fn set_capacity() {
    let ty = basic();
    let err = EnumSet::with_capacity(ty.clone(), 8).unwrap_err();
    assert!(matches!(err, EnumError::CapacityExceeded { count: 11, capacity: 8, .. }));
    let mut set = EnumSet::with_capacity(ty.clone(), 64).unwrap();
    assert_eq!(set.capacity(), 64);
    set.fill();
    assert_eq!(set.count(), 11);
    assert_eq!(walk(&mut set).len(), 11);
    assert_eq!(EnumSet::new(wide()).capacity(), BOUNDS.end);
}

#[test]
fn set_algebra() {
    let ty = basic();
    let mut a = EnumSet::new(ty.clone());
    let mut b = EnumSet::new(ty.clone());
    a.attach_all([1, 2, 3]).unwrap();
    b.attach_all([3, 4]).unwrap();
    assert_eq!(ordinals_of(&a.union(&b).unwrap()), [0, 1, 2, 3]);
    assert_eq!(ordinals_of(&a.intersect(&b).unwrap()), [2]);
    assert_eq!(ordinals_of(&a.diff(&b).unwrap()), [0, 1]);
    assert_eq!(ordinals_of(&a.sym_diff(&b).unwrap()), [0, 1, 3]);
    assert!(matches!(a.union(&EnumSet::new(basic())), Err(EnumError::TypeMismatch { .. })));
}

#[test]
fn set_comparisons() {
    let ty = basic();
    let mut small = EnumSet::new(ty.clone());
    let mut big = EnumSet::new(ty.clone());
    small.attach_all([1, 2]).unwrap();
    big.attach_all([1, 2, 3]).unwrap();
    assert!(small.is_subset(&big));
    assert!(!small.is_superset(&big));
    assert!(big.is_superset(&small));
    assert!(!small.is_equal(&big));
    big.detach(3).unwrap();
    assert_eq!(small, big);
    // another type never compares equal
    assert!(!EnumSet::new(abc()).is_equal(&EnumSet::new(abc())));
}

#[test]
fn set_debug_lists_members() {
    let ty = abc();
    let mut set = EnumSet::new(ty);
    set.attach_all([2, 0]).unwrap();
    assert_eq!(format!("{set:?}"), "{Abc::A(0), Abc::C(2)}");
}

/////////////////////////////////////////////
// enum list

#[test]
fn list_basic() {
    let ty = basic();
    let mut list = EnumList::new(ty.clone(), ListFlags::UNIQUE);
    assert_eq!(list.flags(), ListFlags::UNIQUE);
    assert_eq!(list.enum_type(), &ty);
    let one = ty.get(1).unwrap();
    assert!(!list.contains(&one).unwrap());
    list.attach(&one).unwrap();
    assert!(list.contains(1).unwrap());
    list.attach(2).unwrap();
    assert_eq!(list.detach(one).unwrap(), 1);
    assert!(!list.contains(1).unwrap());
    assert!(list.contains(2).unwrap());
}

#[test]
fn list_keeps_duplicates_without_flags() {
    let ty = abc();
    let mut list = EnumList::new(ty.clone(), ListFlags::default());
    for _ in 0..3 {
        assert!(list.attach(0).unwrap());
    }
    assert_eq!(list.count(), 3);
    assert_eq!(walk(&mut list), [(0, 0), (1, 0), (2, 0)]);
    assert!(list.iter().all(|v| v == ty.get(0).unwrap()));
}

#[test]
fn list_unique_skips_duplicates() {
    let ty = basic();
    let mut list = EnumList::new(ty.clone(), ListFlags::UNIQUE);
    assert!(list.attach(ty.get(1).unwrap()).unwrap());
    assert!(!list.attach(1).unwrap());
    list.attach(ty.get(2).unwrap()).unwrap();
    list.attach(2).unwrap();
    assert_eq!(list.count(), 2);
}

#[test]
fn list_detach_removes_every_entry() {
    let ty = abc();
    let mut list = EnumList::new(ty.clone(), ListFlags::empty());
    list.attach_all([0, 1, 0]).unwrap();
    assert_eq!(list.detach(0).unwrap(), 2);
    assert_eq!(list.count(), 1);
    assert_eq!(ordinals_of(&list), [1]);
    assert_eq!(list.detach(0).unwrap(), 0);
}

#[test]
fn list_ordered_sorts_by_ordinal() {
    let ty = abc();
    for flags in [ListFlags::ORDERED, ListFlags::ORDERED | ListFlags::UNIQUE] {
        let mut list = EnumList::new(ty.clone(), flags);
        list.attach_all([2, 0, 1]).unwrap();
        assert_eq!(ordinals_of(&list), [0, 1, 2]);
        assert!(list.contains(1).unwrap());
    }
}

#[test]
fn list_ordered_matches_stable_sort() {
    let ty = wide();
    let mut list = EnumList::new(ty.clone(), ListFlags::ORDERED);
    let mut attached: Vec<_> = paramd_usize_stream().collect();
    list.attach_all(attached.iter().map(|&i| i as i64)).unwrap();
    attached.sort();
    assert_eq!(ordinals_of(&list), attached);
    for i in paramd_usize_stream().take(10) {
        assert!(list.contains(i as i64).unwrap());
    }
}

#[test]
fn list_unordered_unique_keeps_first_attach_order() {
    let ty = wide();
    let mut list = EnumList::new(ty, ListFlags::UNIQUE);
    let mut model = vec![];
    for i in paramd_usize_stream() {
        list.attach(i as i64).unwrap();
        if !model.contains(&i) {
            model.push(i);
        }
    }
    assert_eq!(ordinals_of(&list), model);
}

#[test]
fn list_iterates_by_index() {
    let ty = basic();
    let mut list = EnumList::new(ty.clone(), ListFlags::UNIQUE);
    assert_eq!(list.count(), 0);
    assert!(!list.valid());
    assert_eq!(list.current(), None);

    let one = ty.get(1).unwrap();
    let two = ty.get(2).unwrap();
    list.attach(&one).unwrap();
    list.attach(&two).unwrap();

    assert!(list.valid());
    assert_eq!(list.key(), 0);
    assert_eq!(list.current(), Some(one.clone()));

    list.next();
    assert!(list.valid());
    assert_eq!(list.key(), 1);
    assert_eq!(list.current(), Some(two));

    list.next();
    assert!(!list.valid());
    assert_eq!(list.key(), 2);
    assert_eq!(list.current(), None);

    list.rewind();
    assert!(list.valid());
    assert_eq!(list.key(), 0);
    assert_eq!(list.current(), Some(one));
}

#[test]
fn list_cursor_shifts_on_detach() {
    let ty = abc();
    let mut list = EnumList::new(ty.clone(), ListFlags::empty());
    list.attach_all([0, 1, 2]).unwrap();
    list.rewind();
    list.next();
    assert_eq!(list.current(), Some(ty.get(1).unwrap()));

    let b = list.current().unwrap();
    list.detach(b).unwrap();
    assert_eq!(list.current(), Some(ty.get(2).unwrap()));

    let c = list.current().unwrap();
    list.detach(c).unwrap();
    assert!(!list.valid());
    assert_eq!(list.current(), None);
}

#[test]
fn list_rejects_foreign_and_undeclared() {
    let mut list = EnumList::new(abc(), ListFlags::empty());
    list.attach(1).unwrap();
    assert!(matches!(list.attach(abc().get(1).unwrap()), Err(EnumError::TypeMismatch { .. })));
    assert!(matches!(list.detach("x"), Err(EnumError::InvalidValue { .. })));
    assert!(list.attach_all([0, 5]).is_err());
    assert_eq!(list.count(), 1);
}

#[test]
fn list_debug_and_clear() {
    let mut list = EnumList::new(abc(), ListFlags::empty());
    list.attach_all([1, 1]).unwrap();
    assert_eq!(format!("{list:?}"), "[Abc::B(1), Abc::B(1)]");
    list.clear();
    assert!(list.is_empty());
}
