use drift_core::Frontier;

#[test]
fn starts_at_root_and_marks_visited_on_dequeue() {
    let mut frontier = Frontier::new(10);
    assert_eq!(frontier.next_route().as_deref(), Some("/"));
    assert!(frontier.is_visited("/"));
    assert_eq!(frontier.pages_processed(), 1);
    assert_eq!(frontier.next_route(), None);
}

#[test]
fn visited_routes_are_never_requeued() {
    let mut frontier = Frontier::new(10);
    let root = frontier.next_route().unwrap();
    let added = frontier.enqueue_discovered(vec![root.clone(), "/about".to_string()]);
    assert_eq!(added, 1);
    assert_eq!(frontier.next_route().as_deref(), Some("/about"));
    frontier.enqueue_discovered(vec!["/".to_string(), "/about".to_string()]);
    assert_eq!(frontier.next_route(), None);
    assert_eq!(frontier.pages_processed(), 2);
}

#[test]
fn queued_duplicates_are_processed_once() {
    let mut frontier = Frontier::new(10);
    frontier.next_route();
    frontier.enqueue_discovered(vec!["/a".to_string(), "/b".to_string()]);
    frontier.enqueue_discovered(vec!["/a".to_string()]);
    assert_eq!(frontier.pending(), 3);

    let order: Vec<String> = std::iter::from_fn(|| frontier.next_route()).collect();
    assert_eq!(order, vec!["/a", "/b"]);
    assert_eq!(frontier.pages_processed(), 3);
}

#[test]
fn traversal_is_breadth_first() {
    // "/" -> a, b ; a -> a1 ; b -> b1
    let mut frontier = Frontier::new(10);
    let mut order = Vec::new();
    while let Some(route) = frontier.next_route() {
        let children: Vec<String> = match route.as_str() {
            "/" => vec!["/a".into(), "/b".into()],
            "/a" => vec!["/a/1".into()],
            "/b" => vec!["/b/1".into()],
            _ => Vec::new(),
        };
        frontier.enqueue_discovered(children);
        order.push(route);
    }
    assert_eq!(order, vec!["/", "/a", "/b", "/a/1", "/b/1"]);
}

#[test]
fn page_budget_caps_unbounded_link_graphs() {
    let mut frontier = Frontier::new(3);
    let mut counter = 0;
    while let Some(_route) = frontier.next_route() {
        counter += 1;
        let fresh = (0..3).map(|i| format!("/page{counter}_{i}")).collect::<Vec<_>>();
        frontier.enqueue_discovered(fresh);
    }
    assert_eq!(frontier.pages_processed(), 3);
    assert!(frontier.budget_exhausted());
}

#[test]
fn pages_processed_is_min_of_reachable_and_budget() {
    for budget in 1..6 {
        let mut frontier = Frontier::new(budget);
        while let Some(route) = frontier.next_route() {
            if route == "/" {
                frontier.enqueue_discovered(vec!["/x".into(), "/y".into()]);
            }
        }
        assert_eq!(frontier.pages_processed(), budget.min(3));
    }
}

#[test]
fn self_and_mutual_links_terminate() {
    let mut frontier = Frontier::new(100);
    while let Some(route) = frontier.next_route() {
        let links = match route.as_str() {
            "/" => vec!["/".into(), "/a".into()],
            "/a" => vec!["/".into(), "/a".into()],
            _ => Vec::new(),
        };
        frontier.enqueue_discovered(links);
    }
    assert_eq!(frontier.pages_processed(), 2);
}
