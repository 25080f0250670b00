//! Document addressing shared by the patch and script processors
//!
//! Patch paths are slash pointers (`/a/0/name=web?/port`), script paths are
//! dotted (`a.list[0].name`). Both parse into the same segments.

use anyhow::{anyhow, bail, Result};
use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key { name: String, optional: bool },
    Index { index: usize, optional: bool },
    /// Past-the-end position of a sequence
    Append,
    /// First sequence element that is a map with `key: value`
    Match {
        key: String,
        value: String,
        optional: bool,
    },
}

impl Segment {
    fn is_optional(&self) -> bool {
        match self {
            Segment::Key { optional, .. }
            | Segment::Index { optional, .. }
            | Segment::Match { optional, .. } => *optional,
            Segment::Append => true,
        }
    }

    fn set_optional(&mut self) {
        match self {
            Segment::Key { optional, .. }
            | Segment::Index { optional, .. }
            | Segment::Match { optional, .. } => *optional = true,
            Segment::Append => {}
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            Segment::Key { .. } => Value::Mapping(Mapping::new()),
            Segment::Index { .. } | Segment::Append | Segment::Match { .. } => {
                Value::Sequence(Vec::new())
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Segment::Key { name, .. } => format!("key '{name}'"),
            Segment::Index { index, .. } => format!("index {index}"),
            Segment::Append => "append position".to_string(),
            Segment::Match { key, value, .. } => format!("element with {key}={value}"),
        }
    }
}

/// Parse a slash pointer. `?` on a token makes it and every later token optional.
pub fn parse_pointer(pointer: &str) -> Result<Vec<Segment>> {
    let Some(rest) = pointer.strip_prefix('/') else {
        bail!("path '{pointer}' must start with '/'");
    };
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    let mut optional = false;
    for raw in rest.split('/') {
        let token = match raw.strip_suffix('?') {
            Some(token) => {
                optional = true;
                token
            }
            None => raw,
        };
        let token = token.replace("~1", "/").replace("~0", "~");
        segments.push(parse_token(&token, optional)?);
    }
    Ok(segments)
}

fn parse_token(token: &str, optional: bool) -> Result<Segment> {
    if token == "-" {
        return Ok(Segment::Append);
    }
    if let Ok(index) = token.parse::<usize>() {
        return Ok(Segment::Index { index, optional });
    }
    if let Some((key, value)) = token.split_once('=') {
        if key.is_empty() {
            bail!("matcher '{token}' has an empty key");
        }
        return Ok(Segment::Match {
            key: key.to_string(),
            value: value.to_string(),
            optional,
        });
    }
    if token.is_empty() {
        bail!("empty path token");
    }
    Ok(Segment::Key {
        name: token.to_string(),
        optional,
    })
}

/// Parse a dotted path with bracket selectors: `a.b[0]`, `a.b[+]`, `a.b[name=x]`.
/// An empty path addresses the document root.
pub fn parse_dotted(path: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    if path.is_empty() {
        return Ok(segments);
    }

    for part in path.split('.') {
        let (key, mut selectors) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(Segment::Key {
                name: key.to_string(),
                optional: false,
            });
        } else if selectors.is_empty() {
            bail!("path '{path}' contains an empty segment");
        }

        while !selectors.is_empty() {
            let end = selectors
                .find(']')
                .ok_or_else(|| anyhow!("unclosed '[' in path '{path}'"))?;
            let inner = &selectors[1..end];
            let segment = if inner == "+" {
                Segment::Append
            } else {
                parse_token(inner, false)?
            };
            segments.push(segment);
            selectors = &selectors[end + 1..];
            if !selectors.is_empty() && !selectors.starts_with('[') {
                bail!("unexpected '{selectors}' in path '{path}'");
            }
        }
    }
    Ok(segments)
}

/// Mark every segment optional, making lookups tolerant of missing nodes
pub fn all_optional(mut segments: Vec<Segment>) -> Vec<Segment> {
    segments.iter_mut().for_each(Segment::set_optional);
    segments
}

/// Set the node addressed by `path` to `value`.
///
/// Missing intermediate nodes are created when the segment is optional or
/// `create` is set; otherwise a missing node is an error.
pub fn set(node: &mut Value, path: &[Segment], value: Value, create: bool) -> Result<()> {
    let Some((head, rest)) = path.split_first() else {
        *node = value;
        return Ok(());
    };
    let may_create = create || head.is_optional();

    if rest.is_empty() {
        return assign(node, head, value, may_create);
    }
    let child = child_mut(node, head, may_create)?;
    set(child, rest, value, create)
}

/// Return the node addressed by `path`, creating it as null when `create` is set
pub fn resolve_mut<'a>(
    node: &'a mut Value,
    path: &[Segment],
    create: bool,
) -> Result<&'a mut Value> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(node);
    };
    let child = child_mut(node, head, create || head.is_optional())?;
    resolve_mut(child, rest, create)
}

/// Remove the node addressed by `path`; missing optional nodes are ignored
pub fn remove(node: &mut Value, path: &[Segment]) -> Result<()> {
    let Some((head, rest)) = path.split_first() else {
        bail!("cannot remove the document root");
    };

    if !has_child(node, head)? {
        if head.is_optional() {
            return Ok(());
        }
        bail!("{} not found", head.describe());
    }

    if !rest.is_empty() {
        let child = find_child_mut(node, head)?
            .ok_or_else(|| anyhow!("{} not found", head.describe()))?;
        return remove(child, rest);
    }

    match (node, head) {
        (Value::Mapping(map), Segment::Key { name, .. }) => {
            map.shift_remove(name.as_str());
        }
        (Value::Mapping(map), Segment::Index { index, .. }) => {
            map.shift_remove(index.to_string().as_str());
        }
        (Value::Sequence(seq), Segment::Index { index, .. }) => {
            seq.remove(*index);
        }
        (Value::Sequence(seq), Segment::Match { key, value, .. }) => {
            if let Some(pos) = match_position(seq, key, value) {
                seq.remove(pos);
            }
        }
        (_, segment) => bail!("cannot remove {}", segment.describe()),
    }
    Ok(())
}

/// Recursively merge `incoming` into `target`; maps merge key by key, every
/// other value replaces what was there.
pub fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Mapping(existing), Value::Mapping(incoming)) => {
            for (key, value) in incoming {
                if let Some(slot) = existing.get_mut(&key) {
                    deep_merge(slot, value);
                } else {
                    existing.insert(key, value);
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}

fn assign(node: &mut Value, segment: &Segment, value: Value, may_create: bool) -> Result<()> {
    if node.is_null() && may_create {
        *node = segment.empty_container();
    }

    match (node, segment) {
        (Value::Mapping(map), Segment::Key { name, .. }) => {
            assign_key(map, name.clone(), value, may_create)
        }
        (Value::Mapping(map), Segment::Index { index, .. }) => {
            assign_key(map, index.to_string(), value, may_create)
        }
        (Value::Sequence(seq), Segment::Index { index, .. }) => {
            let len = seq.len();
            let slot = seq
                .get_mut(*index)
                .ok_or_else(|| anyhow!("index {index} out of range (length {len})"))?;
            *slot = value;
            Ok(())
        }
        (Value::Sequence(seq), Segment::Append) => {
            seq.push(value);
            Ok(())
        }
        (Value::Sequence(seq), Segment::Match { key, value: want, .. }) => {
            match match_position(seq, key, want) {
                Some(pos) => seq[pos] = value,
                None if may_create => seq.push(value),
                None => bail!("no element with {key}={want}"),
            }
            Ok(())
        }
        (node, segment) => bail!(
            "cannot address {} in a {}",
            segment.describe(),
            kind_of(node)
        ),
    }
}

fn assign_key(map: &mut Mapping, key: String, value: Value, may_create: bool) -> Result<()> {
    if !may_create && !map.contains_key(key.as_str()) {
        bail!("key '{key}' not found");
    }
    map.insert(Value::String(key), value);
    Ok(())
}

fn child_mut<'a>(
    node: &'a mut Value,
    segment: &Segment,
    may_create: bool,
) -> Result<&'a mut Value> {
    if node.is_null() && may_create {
        *node = segment.empty_container();
    }
    if !has_child(node, segment)? {
        if !may_create {
            bail!("{} not found", segment.describe());
        }
        create_child(node, segment)?;
    }
    find_child_mut(node, segment)?.ok_or_else(|| anyhow!("{} not found", segment.describe()))
}

fn has_child(node: &Value, segment: &Segment) -> Result<bool> {
    Ok(match (node, segment) {
        (Value::Mapping(map), Segment::Key { name, .. }) => map.contains_key(name.as_str()),
        (Value::Mapping(map), Segment::Index { index, .. }) => {
            map.contains_key(index.to_string().as_str())
        }
        (Value::Sequence(seq), Segment::Index { index, .. }) => *index < seq.len(),
        (Value::Sequence(_), Segment::Append) => false,
        (Value::Sequence(seq), Segment::Match { key, value, .. }) => {
            match_position(seq, key, value).is_some()
        }
        (Value::Null, _) => false,
        (node, segment) => bail!(
            "cannot address {} in a {}",
            segment.describe(),
            kind_of(node)
        ),
    })
}

fn create_child(node: &mut Value, segment: &Segment) -> Result<()> {
    match (node, segment) {
        (Value::Mapping(map), Segment::Key { name, .. }) => {
            map.insert(Value::String(name.clone()), Value::Null);
        }
        (Value::Mapping(map), Segment::Index { index, .. }) => {
            map.insert(Value::String(index.to_string()), Value::Null);
        }
        (Value::Sequence(seq), Segment::Append) => seq.push(Value::Null),
        (Value::Sequence(seq), Segment::Match { key, value, .. }) => {
            let mut element = Mapping::new();
            element.insert(Value::String(key.clone()), Value::String(value.clone()));
            seq.push(Value::Mapping(element));
        }
        (_, segment) => bail!("cannot create {}", segment.describe()),
    }
    Ok(())
}

fn find_child_mut<'a>(node: &'a mut Value, segment: &Segment) -> Result<Option<&'a mut Value>> {
    Ok(match (node, segment) {
        (Value::Mapping(map), Segment::Key { name, .. }) => map.get_mut(name.as_str()),
        (Value::Mapping(map), Segment::Index { index, .. }) => {
            map.get_mut(index.to_string().as_str())
        }
        (Value::Sequence(seq), Segment::Index { index, .. }) => seq.get_mut(*index),
        (Value::Sequence(seq), Segment::Append) => seq.last_mut(),
        (Value::Sequence(seq), Segment::Match { key, value, .. }) => {
            match match_position(seq, key, value) {
                Some(pos) => seq.get_mut(pos),
                None => None,
            }
        }
        (Value::Null, _) => None,
        (node, segment) => bail!(
            "cannot address {} in a {}",
            segment.describe(),
            kind_of(node)
        ),
    })
}

fn match_position(seq: &[Value], key: &str, want: &str) -> Option<usize> {
    seq.iter().position(|element| {
        element
            .get(key)
            .and_then(scalar_text)
            .is_some_and(|text| text == want)
    })
}

/// Text form of a scalar, `None` for maps and sequences
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "map",
        Value::Tagged(_) => "tagged value",
    }
}
