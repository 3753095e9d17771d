//! A small CSS selector engine for resolving directive targets.
//!
//! Supported grammar: type selectors, `*`, `#id`, `.class`, attribute
//! conditions (`[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`, with
//! quoted or bare values), the descendant, child (`>`), adjacent (`+`) and
//! general sibling (`~`) combinators, and comma-separated selector lists.
//!
//! Parsing is strict: anything outside that grammar is a [`SelectorError`].
//! Behavior code treats such an error as "no target" rather than a failure.

use crate::dom::{Document, ElementId};
use std::str::FromStr;

/// Why a selector string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one of its comma-separated groups) is blank.
    #[error("empty selector in {0:?}")]
    Empty(String),
    /// A character that cannot start or continue a selector component.
    #[error("unexpected {found:?} at offset {offset} in selector {selector:?}")]
    Unexpected {
        /// The full selector text.
        selector: String,
        /// Byte offset of the offending character.
        offset: usize,
        /// The offending character.
        found: char,
    },
    /// An attribute condition missing its closing bracket or quote.
    #[error("unterminated attribute condition in selector {0:?}")]
    UnterminatedAttribute(String),
    /// A combinator with nothing on one of its sides.
    #[error("dangling combinator in selector {0:?}")]
    DanglingCombinator(String),
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Vec<Part>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    compound: Compound,
    // Relation to the part on the left; `None` for the leftmost part.
    combinator: Option<Combinator>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists(String),
    Equals(String, String),
    Includes(String, String),
    Prefix(String, String),
    Suffix(String, String),
    Substring(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    Adjacent,
    General,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        Parser::new(selector).parse()
    }

    /// Whether `id` matches any group of this selector list.
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.groups.iter().any(|parts| matches_chain(doc, id, parts))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// --- Matching ---

fn matches_chain(doc: &Document, id: ElementId, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_compound(doc, id, &last.compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    // Descendant and general-sibling steps try every candidate, so a failed
    // step further left falls back to the next farther match.
    match last.combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => doc
            .parent(id)
            .is_some_and(|parent| matches_chain(doc, parent, rest)),
        Combinator::Adjacent => doc
            .previous_element_sibling(id)
            .is_some_and(|sibling| matches_chain(doc, sibling, rest)),
        Combinator::Descendant => {
            let mut cursor = doc.parent(id);
            while let Some(ancestor) = cursor {
                if matches_chain(doc, ancestor, rest) {
                    return true;
                }
                cursor = doc.parent(ancestor);
            }
            false
        }
        Combinator::General => {
            let mut cursor = doc.previous_element_sibling(id);
            while let Some(sibling) = cursor {
                if matches_chain(doc, sibling, rest) {
                    return true;
                }
                cursor = doc.previous_element_sibling(sibling);
            }
            false
        }
    }
}

fn matches_compound(doc: &Document, id: ElementId, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if !doc.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
    }
    if let Some(want) = &compound.id {
        if doc.attribute(id, "id") != Some(want.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| doc.has_class(id, c)) {
        return false;
    }
    compound.attrs.iter().all(|cond| match cond {
        AttrCondition::Exists(name) => attr_value(doc, id, name).is_some(),
        AttrCondition::Equals(name, v) => attr_value(doc, id, name).is_some_and(|a| a == *v),
        AttrCondition::Includes(name, v) => attr_value(doc, id, name)
            .is_some_and(|a| a.split_whitespace().any(|w| w == v.as_str())),
        AttrCondition::Prefix(name, v) => {
            !v.is_empty() && attr_value(doc, id, name).is_some_and(|a| a.starts_with(v.as_str()))
        }
        AttrCondition::Suffix(name, v) => {
            !v.is_empty() && attr_value(doc, id, name).is_some_and(|a| a.ends_with(v.as_str()))
        }
        AttrCondition::Substring(name, v) => {
            !v.is_empty() && attr_value(doc, id, name).is_some_and(|a| a.contains(v.as_str()))
        }
    })
}

// `[class~=x]` and friends see the class list as its attribute form.
fn attr_value(doc: &Document, id: ElementId, name: &str) -> Option<String> {
    if name == "class" {
        let classes = doc.classes(id);
        return (!classes.is_empty()).then(|| classes.join(" "));
    }
    doc.attribute(id, name).map(str::to_string)
}

// --- Parsing ---

struct Parser<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|(o, _)| *o).unwrap_or(self.src.len())
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                selector: self.src.to_string(),
                offset: self.offset(),
                found,
            },
            None => SelectorError::Empty(self.src.to_string()),
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut groups = Vec::new();
        loop {
            groups.push(self.parse_group()?);
            match self.peek() {
                Some(',') => self.pos += 1,
                None => break,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Selector { groups })
    }

    fn parse_group(&mut self) -> Result<Vec<Part>, SelectorError> {
        let mut parts: Vec<Part> = Vec::new();
        let mut pending: Option<Combinator> = None;
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(c @ ('>' | '+' | '~')) => {
                    if parts.is_empty() || pending.is_some() {
                        return Err(SelectorError::DanglingCombinator(self.src.to_string()));
                    }
                    pending = Some(match c {
                        '>' => Combinator::Child,
                        '+' => Combinator::Adjacent,
                        _ => Combinator::General,
                    });
                    self.pos += 1;
                }
                Some(_) => {
                    if !parts.is_empty() && pending.is_none() && !had_space {
                        return Err(self.unexpected());
                    }
                    let compound = self.parse_compound()?;
                    let combinator = if parts.is_empty() {
                        None
                    } else {
                        Some(pending.take().unwrap_or(Combinator::Descendant))
                    };
                    parts.push(Part {
                        compound,
                        combinator,
                    });
                }
            }
        }
        if pending.is_some() {
            return Err(SelectorError::DanglingCombinator(self.src.to_string()));
        }
        if parts.is_empty() {
            return Err(SelectorError::Empty(self.src.to_string()));
        }
        Ok(parts)
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut consumed = false;
        while let Some(c) = self.peek() {
            match c {
                '*' if !consumed => {
                    self.pos += 1;
                }
                '#' => {
                    self.pos += 1;
                    let id = self.parse_ident()?;
                    if compound.id.replace(id).is_some() {
                        return Err(self.unexpected());
                    }
                }
                '.' => {
                    self.pos += 1;
                    let class = self.parse_ident()?;
                    compound.classes.push(class);
                }
                '[' => {
                    let cond = self.parse_attr()?;
                    compound.attrs.push(cond);
                }
                c if is_ident_char(c) && !consumed => {
                    compound.tag = Some(self.parse_ident()?);
                }
                c if c.is_whitespace() || matches!(c, ',' | '>' | '+' | '~') => break,
                _ => return Err(self.unexpected()),
            }
            consumed = true;
        }
        if !consumed {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().map(|(_, c)| *c).collect())
    }

    fn parse_attr(&mut self) -> Result<AttrCondition, SelectorError> {
        self.pos += 1; // '['
        self.skip_whitespace();
        let name = self.parse_ident()?;
        self.skip_whitespace();

        let op = match self.peek() {
            None => return Err(self.unterminated_attr()),
            Some(']') => {
                self.pos += 1;
                return Ok(AttrCondition::Exists(name));
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(c @ ('~' | '^' | '$' | '*')) => {
                self.pos += 1;
                if self.peek() != Some('=') {
                    return Err(self.unexpected());
                }
                self.pos += 1;
                c
            }
            Some(_) => return Err(self.unexpected()),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            None => return Err(self.unterminated_attr()),
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.unterminated_attr());
                }
                let value: String = self.chars[start..self.pos].iter().map(|(_, c)| *c).collect();
                self.pos += 1;
                value
            }
            Some(_) => self.parse_ident()?,
        };
        self.skip_whitespace();
        match self.peek() {
            Some(']') => self.pos += 1,
            None => return Err(self.unterminated_attr()),
            Some(_) => return Err(self.unexpected()),
        }

        Ok(match op {
            '=' => AttrCondition::Equals(name, value),
            '~' => AttrCondition::Includes(name, value),
            '^' => AttrCondition::Prefix(name, value),
            '$' => AttrCondition::Suffix(name, value),
            _ => AttrCondition::Substring(name, value),
        })
    }

    fn unterminated_attr(&self) -> SelectorError {
        SelectorError::UnterminatedAttribute(self.src.to_string())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
