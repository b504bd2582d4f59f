//! Integration tests for end-to-end flattening: parse, traverse, render.

use tree_flattener_core::{parse, FlattenError, Flattener, NodeStore, Strategy};

fn run(input: &str, root: &str) -> Vec<Strategy> {
    let store = parse(input.as_bytes()).unwrap();
    Flattener::new(&store)
        .flatten(root)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn run_lines(input: &str, root: &str) -> Vec<String> {
    run(input, root).iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_numeric_narrowing_example() {
    // x>10 then x>5: the second bound is implied and disappears;
    // x>10 then x<=5: contradictory, the B leaf emits nothing
    let input = "\
0:[x>10] yes=1,no=2
1:[x>5] yes=3,no=4
3:leaf=A
4:leaf=B
2:leaf=C
";
    assert_eq!(run_lines(input, "0"), vec!["(x>10) -> A", "(x<=10) -> C"]);
}

#[test]
fn test_single_condition_round_trip() {
    // a path with one condition renders exactly that condition
    let input = "0:[balance>=2.5] yes=1,no=2\n1:leaf=release\n2:leaf=hold\n";
    assert_eq!(
        run_lines(input, "0"),
        vec!["(balance>=2.5) -> release", "(balance<2.5) -> hold"]
    );
}

#[test]
fn test_categorical_branches() {
    let input = "\
0:[device_type=pc] yes=1,no=2
1:leaf=0.111
2:[browser=firefox] yes=3,no=4
3:leaf=0.222
4:leaf=0.333
";
    assert_eq!(
        run_lines(input, "0"),
        vec![
            "(device_type=pc) -> 0.111",
            "(device_type!=pc) and (browser=firefox) -> 0.222",
            "(device_type!=pc) and (browser!=firefox) -> 0.333",
        ]
    );
}

#[test]
fn test_repeated_equality_prunes_no_branch() {
    // after x=4 on the path, re-testing x=4 can only go "yes"
    let input = "\
0:[x=4] yes=1,no=2
1:leaf=0.1
2:[x=4] yes=3,no=4
3:leaf=0.111
4:leaf=0.9
";
    assert_eq!(run_lines(input, "0"), vec!["(x=4) -> 0.1", "(x!=4) -> 0.9"]);
}

#[test]
fn test_redundant_inequality_omitted() {
    // x=4 already implies x!=3; the negated branch (x=3) contradicts x=4
    let input = "\
0:[x=4] yes=1,no=2
1:[x!=3] yes=3,no=4
3:leaf=0.111
4:leaf=0.222
2:leaf=0.9
";
    assert_eq!(
        run_lines(input, "0"),
        vec!["(x=4) -> 0.111", "(x!=4) -> 0.9"]
    );
}

#[test]
fn test_two_sided_bounds_render_as_pair() {
    let input = "\
0:[x>1] yes=1,no=2
1:[x<=4] yes=3,no=4
3:leaf=mid
4:leaf=high
2:leaf=low
";
    assert_eq!(
        run_lines(input, "0"),
        vec!["(x>1) and (x<=4) -> mid", "(x>4) -> high", "(x<=1) -> low"]
    );
}

#[test]
fn test_bounds_collapsing_to_equality() {
    // x>=3 and x<=3 is exactly x=3
    let input = "\
0:[x>=3] yes=1,no=2
1:[x<=3] yes=3,no=4
3:leaf=point
4:leaf=above
2:leaf=below
";
    assert_eq!(
        run_lines(input, "0"),
        vec!["(x=3) -> point", "(x>3) -> above", "(x<3) -> below"]
    );
}

#[test]
fn test_leaf_coverage_with_mixed_variables() {
    // every feasible leaf emits exactly once, pruned leaves not at all
    let input = "\
0:[score>10] yes=1,no=2
1:[region=emea] yes=3,no=4
2:[score>20] yes=5,no=6
3:leaf=A
4:leaf=B
5:leaf=never
6:leaf=C
";
    let strategies = run(input, "0");
    // score>20 under score<=10 is contradictory: leaf "never" is pruned
    let outcomes: Vec<&str> = strategies.iter().map(|s| s.outcome.as_str()).collect();
    assert_eq!(outcomes, vec!["A", "B", "C"]);
}

#[test]
fn test_determinism_byte_identical() {
    let input = "\
0:[score>10] yes=1,no=2
1:[region=emea] yes=3,no=4
2:leaf=C
3:leaf=A
4:leaf=B
";
    let first = run_lines(input, "0").join("\n");
    let second = run_lines(input, "0").join("\n");
    assert_eq!(first, second);
}

#[test]
fn test_variables_render_in_first_introduced_order() {
    let input = "\
0:[b>1] yes=1,no=4
1:[a=7] yes=2,no=4
2:[b<=9] yes=3,no=4
3:leaf=X
4:leaf=Y
";
    let strategies = run(input, "0");
    assert_eq!(strategies[0].to_string(), "(b>1) and (b<=9) and (a=7) -> X");
}

#[test]
fn test_deep_skewed_tree_does_not_overflow() {
    // 50k-deep chain; native recursion would exhaust the call stack
    let depth = 50_000;
    let mut input = String::new();
    for i in 0..depth {
        input.push_str(&format!("{}:[x>{}] yes={},no=L{}\n", i, i, i + 1, i));
        input.push_str(&format!("L{}:leaf=no{}\n", i, i));
    }
    input.push_str(&format!("{}:leaf=deep\n", depth));

    let store = parse(input.as_bytes()).unwrap();
    let mut count = 0usize;
    for item in Flattener::new(&store).flatten("0").unwrap() {
        item.unwrap();
        count += 1;
    }
    // every "no" leaf is feasible ((i-1, i] each), plus the deep leaf
    assert_eq!(count, depth + 1);
}

#[test]
fn test_strategies_stream_lazily() {
    let input = "0:[x>10] yes=1,no=2\n1:leaf=A\n2:leaf=B\n";
    let store = parse(input.as_bytes()).unwrap();
    let mut iter = Flattener::new(&store).flatten("0").unwrap();
    // first strategy is available before the traversal has finished
    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.outcome, "A");
    assert_eq!(iter.stats().strategies_emitted, 1);
    let second = iter.next().unwrap().unwrap();
    assert_eq!(second.outcome, "B");
    assert!(iter.next().is_none());
}

#[test]
fn test_empty_store_root_is_unreachable() {
    let store = NodeStore::new();
    assert_eq!(
        Flattener::new(&store).flatten("0").unwrap_err(),
        FlattenError::UnreachableRoot("0".to_string())
    );
}

#[test]
fn test_strategy_json_shape() {
    let input = "0:[x>10] yes=1,no=2\n1:leaf=A\n2:leaf=B\n";
    let strategies = run(input, "0");
    let json = serde_json::to_string(&strategies[0]).unwrap();
    assert_eq!(
        json,
        r#"{"conditions":[{"variable":"x","op":">","operand":10.0}],"outcome":"A"}"#
    );
}
