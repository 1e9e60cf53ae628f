//! Graph isomorphism modulo blank node labels.
//!
//! Two graphs are isomorphic when a bijection between their blank nodes maps
//! one triple set exactly onto the other. Candidates are narrowed with color
//! refinement (each blank node is hashed together with its neighbourhood until
//! the partition stops splitting), then a backtracking search tries the
//! remaining bijections class by class.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::graph::Graph;
use crate::term::{Node, Object, Triple};

type Color = u64;

fn hash_of<T: Hash>(value: T) -> Color {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

fn is_ground(t: &Triple) -> bool {
    !t.subject.is_blank() && !matches!(&t.object, Object::Node(Node::Blank(_)))
}

fn blank_labels(g: &Graph) -> BTreeSet<&str> {
    let mut out = BTreeSet::new();
    for t in g {
        if let Node::Blank(s) = &t.subject {
            out.insert(s.as_str());
        }
        if let Object::Node(Node::Blank(o)) = &t.object {
            out.insert(o.as_str());
        }
    }
    out
}

fn node_color(node: &Node, colors: &HashMap<&str, Color>) -> Color {
    match node {
        Node::Iri(iri) => hash_of(("iri", iri)),
        Node::Blank(label) => hash_of(("blank", colors.get(label.as_str()).copied().unwrap_or(0))),
    }
}

fn object_color(object: &Object, colors: &HashMap<&str, Color>) -> Color {
    match object {
        Object::Node(node) => node_color(node, colors),
        Object::Literal(lit) => hash_of(("lit", lit)),
    }
}

fn distinct(colors: &HashMap<&str, Color>) -> usize {
    colors.values().collect::<HashSet<_>>().len()
}

fn refine<'a>(g: &'a Graph, blanks: &BTreeSet<&'a str>) -> HashMap<&'a str, Color> {
    let mut colors: HashMap<&str, Color> = blanks.iter().map(|b| (*b, 0)).collect();

    for _ in 0..=blanks.len() {
        let mut signatures: HashMap<&str, Vec<Color>> =
            blanks.iter().map(|b| (*b, Vec::new())).collect();

        for t in g {
            if let Node::Blank(s) = &t.subject {
                let sig = hash_of(("out", &t.predicate, object_color(&t.object, &colors)));
                if let Some(v) = signatures.get_mut(s.as_str()) {
                    v.push(sig);
                }
            }
            if let Object::Node(Node::Blank(o)) = &t.object {
                let sig = hash_of(("in", &t.predicate, node_color(&t.subject, &colors)));
                if let Some(v) = signatures.get_mut(o.as_str()) {
                    v.push(sig);
                }
            }
        }

        let next: HashMap<&str, Color> = signatures
            .into_iter()
            .map(|(b, mut sigs)| {
                sigs.sort_unstable();
                let old = colors.get(b).copied().unwrap_or(0);
                (b, hash_of((old, sigs)))
            })
            .collect();

        let stable = distinct(&next) == distinct(&colors);
        colors = next;
        if stable {
            break;
        }
    }

    colors
}

fn relabel(t: &Triple, mapping: &HashMap<&str, &str>) -> Triple {
    let map_node = |n: &Node| match n {
        Node::Blank(label) => Node::Blank(
            mapping
                .get(label.as_str())
                .map(|m| m.to_string())
                .unwrap_or_else(|| label.clone()),
        ),
        other => other.clone(),
    };
    Triple {
        subject: map_node(&t.subject),
        predicate: t.predicate.clone(),
        object: match &t.object {
            Object::Node(n) => Object::Node(map_node(n)),
            lit => lit.clone(),
        },
    }
}

struct Search<'a> {
    order: Vec<&'a str>,
    colors_a: HashMap<&'a str, Color>,
    candidates: HashMap<Color, Vec<&'a str>>,
    a_blank_triples: Vec<&'a Triple>,
    b: &'a Graph,
}

impl<'a> Search<'a> {
    fn run(
        &self,
        idx: usize,
        used: &mut HashSet<&'a str>,
        mapping: &mut HashMap<&'a str, &'a str>,
    ) -> bool {
        let Some(a_node) = self.order.get(idx).copied() else {
            return self
                .a_blank_triples
                .iter()
                .all(|t| self.b.contains(&relabel(t, mapping)));
        };

        let color = self.colors_a.get(a_node).copied().unwrap_or(0);
        let Some(options) = self.candidates.get(&color) else {
            return false;
        };

        for &b_node in options {
            if used.contains(b_node) {
                continue;
            }
            used.insert(b_node);
            mapping.insert(a_node, b_node);
            if self.run(idx + 1, used, mapping) {
                return true;
            }
            mapping.remove(a_node);
            used.remove(b_node);
        }
        false
    }
}

/// Whether `a` and `b` are equal up to a renaming of blank nodes.
pub fn is_isomorphic(a: &Graph, b: &Graph) -> bool {
    if a == b {
        return true;
    }
    if a.len() != b.len() {
        return false;
    }

    let ground_a: Vec<&Triple> = a.iter().filter(|t| is_ground(t)).collect();
    if ground_a.iter().any(|t| !b.contains(t)) {
        return false;
    }
    if b.iter().filter(|t| is_ground(t)).count() != ground_a.len() {
        return false;
    }

    let blanks_a = blank_labels(a);
    let blanks_b = blank_labels(b);
    if blanks_a.len() != blanks_b.len() {
        return false;
    }

    let colors_a = refine(a, &blanks_a);
    let colors_b = refine(b, &blanks_b);

    let mut hist_a: Vec<Color> = colors_a.values().copied().collect();
    let mut hist_b: Vec<Color> = colors_b.values().copied().collect();
    hist_a.sort_unstable();
    hist_b.sort_unstable();
    if hist_a != hist_b {
        return false;
    }

    let mut candidates: HashMap<Color, Vec<&str>> = HashMap::new();
    for (label, color) in &colors_b {
        candidates.entry(*color).or_default().push(*label);
    }
    for options in candidates.values_mut() {
        options.sort_unstable();
    }

    // Smallest classes first keeps the branching factor low near the root.
    let mut order: Vec<&str> = blanks_a.iter().copied().collect();
    order.sort_by_key(|label| {
        let color = colors_a.get(label).copied().unwrap_or(0);
        (candidates.get(&color).map_or(0, Vec::len), *label)
    });

    let search = Search {
        order,
        colors_a,
        candidates,
        a_blank_triples: a.iter().filter(|t| !is_ground(t)).collect(),
        b,
    };
    search.run(0, &mut HashSet::new(), &mut HashMap::new())
}
