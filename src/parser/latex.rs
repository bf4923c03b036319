//! LaTeX tree builder.
//!
//! A small recursive-descent reader that turns LaTeX source into a tree of
//! environments, commands, groups, math and text. It understands just enough
//! of the grammar to locate tabular environments, attribute `\label`s to them
//! and recover their source span; it does not expand macros.

use std::fmt;
use std::ops::Range;

use crate::error::Result;
use crate::model::TabularData;

use super::MarkupTree;

/// Environments treated as tabular regions.
pub const TABULAR_ENVIRONMENTS: &[&str] = &["tabular", "tabular*", "tabularx", "longtable"];

/// Float environments whose label may belong to an inner tabular.
const FLOAT_ENVIRONMENTS: &[&str] = &["table", "table*", "sidewaystable"];

/// Environments whose body is read verbatim.
const VERBATIM_ENVIRONMENTS: &[&str] = &["verbatim", "verbatim*", "lstlisting", "minted", "comment"];

/// Definition commands whose bodies are kept as raw text.
const DEFINITION_COMMANDS: &[&str] = &[
    "newcommand",
    "renewcommand",
    "providecommand",
    "DeclareRobustCommand",
    "newenvironment",
    "renewenvironment",
    "def",
    "gdef",
    "edef",
    "xdef",
];

/// Commands whose first argument is a URL read verbatim.
const URL_COMMANDS: &[&str] = &["url", "href", "nolinkurl"];

/// Commands that draw rules and carry no cell content.
const RULE_COMMANDS: &[&str] = &[
    "hline",
    "toprule",
    "midrule",
    "bottomrule",
    "cline",
    "cmidrule",
    "hhline",
    "addlinespace",
    "endhead",
    "endfirsthead",
    "endfoot",
    "endlastfoot",
];

/// A node of the LaTeX tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LatexNode {
    /// Plain text between markup
    Text(String),

    /// A control sequence with its immediately following arguments
    Command {
        name: String,
        /// Raw `[...]` arguments
        options: Vec<String>,
        /// `{...}` arguments, each a list of nodes
        args: Vec<Vec<LatexNode>>,
    },

    /// A bare `{...}` group
    Group(Vec<LatexNode>),

    /// `\begin{name} ... \end{name}`
    Environment {
        name: String,
        /// Raw arguments directly after `\begin{name}` (column spec, placement)
        args: Vec<String>,
        children: Vec<LatexNode>,
        /// Byte range of the whole environment in the source
        span: Range<usize>,
    },

    /// Inline or display math, kept raw including delimiters
    Math(String),
}

impl LatexNode {
    /// Environment name, if this node is an environment.
    pub fn env_name(&self) -> Option<&str> {
        match self {
            LatexNode::Environment { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this node is one of the tabular environments.
    pub fn is_tabular(&self) -> bool {
        self.env_name()
            .is_some_and(|n| TABULAR_ENVIRONMENTS.contains(&n))
    }

    fn is_float(&self) -> bool {
        self.env_name()
            .is_some_and(|n| FLOAT_ENVIRONMENTS.contains(&n))
    }

    /// Direct children of this node (arguments included for commands).
    pub fn children(&self) -> Box<dyn Iterator<Item = &LatexNode> + '_> {
        match self {
            LatexNode::Group(children) | LatexNode::Environment { children, .. } => {
                Box::new(children.iter())
            }
            LatexNode::Command { args, .. } => Box::new(args.iter().flatten()),
            LatexNode::Text(_) | LatexNode::Math(_) => Box::new(std::iter::empty()),
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            LatexNode::Text(text) | LatexNode::Math(text) => out.push_str(text),
            _ => {
                for child in self.children() {
                    child.push_text(out);
                }
            }
        }
    }

    /// First `\label{..}` at or below this node, in document order.
    fn first_label(&self) -> Option<String> {
        if let LatexNode::Command { name, args, .. } = self {
            if name == "label" {
                if let Some(arg) = args.first() {
                    let label: String = arg.iter().map(LatexNode::text_content).collect();
                    let label = label.trim();
                    if !label.is_empty() {
                        return Some(label.to_string());
                    }
                }
            }
        }
        self.children().find_map(LatexNode::first_label)
    }

    fn count_tabulars(&self) -> usize {
        let own = usize::from(self.is_tabular());
        own + self.children().map(LatexNode::count_tabulars).sum::<usize>()
    }
}

/// A tabular environment located in a [`LatexTree`].
#[derive(Debug, Clone, Copy)]
pub struct LatexTable<'a> {
    /// The tabular environment node
    pub node: &'a LatexNode,
    /// Nearest enclosing float (`table`, `table*`), if any
    pub float: Option<&'a LatexNode>,
}

impl<'a> LatexTable<'a> {
    /// Number of content rows: the body split on `\\`, ignoring rows that
    /// hold nothing but rules and whitespace.
    pub fn row_count(&self) -> usize {
        let mut rows = 0;
        let mut has_content = false;
        for child in self.node.children() {
            match child {
                LatexNode::Command { name, .. } if name == "\\" || name == "tabularnewline" => {
                    rows += usize::from(has_content);
                    has_content = false;
                }
                LatexNode::Command { name, .. } if RULE_COMMANDS.contains(&name.as_str()) => {}
                LatexNode::Text(text) if text.trim().is_empty() => {}
                _ => has_content = true,
            }
        }
        rows + usize::from(has_content)
    }
}

/// Syntax error raised while building a [`LatexTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// 1-based line of the offending input
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Parsed LaTeX document.
#[derive(Debug, Clone)]
pub struct LatexTree {
    source: String,
    nodes: Vec<LatexNode>,
}

impl LatexTree {
    /// Parse LaTeX source into a tree.
    pub fn parse(source: &str) -> std::result::Result<Self, SyntaxError> {
        let mut reader = Reader { src: source, pos: 0 };
        let nodes = reader.nodes(Stop::Eof)?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[LatexNode] {
        &self.nodes
    }

    /// Raw source of an environment node (empty for other nodes).
    pub fn source_of(&self, node: &LatexNode) -> &str {
        match node {
            LatexNode::Environment { span, .. } => &self.source[span.clone()],
            _ => "",
        }
    }

    /// All environments named `name`, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&LatexNode> {
        let mut found = Vec::new();
        for node in &self.nodes {
            collect_envs(node, &|n| n.env_name() == Some(name), &mut found);
        }
        found
    }

    /// All tabular environments with their enclosing floats, in document order.
    pub fn tables(&self) -> Vec<LatexTable<'_>> {
        let mut found = Vec::new();
        for node in &self.nodes {
            collect_tables(node, None, &mut found);
        }
        found
    }

    /// Cross-reference label of a table.
    ///
    /// A `\label` inside the tabular wins; otherwise the enclosing float's
    /// label is used when that float holds this tabular alone.
    pub fn label_of(&self, table: &LatexTable<'_>) -> Option<String> {
        if let Some(label) = table.node.first_label() {
            return Some(label);
        }
        let float = table.float?;
        if float.count_tabulars() == 1 {
            float.first_label()
        } else {
            None
        }
    }
}

impl MarkupTree for LatexTree {
    type Node<'a> = LatexTable<'a>;

    fn find_tables(&self) -> Vec<LatexTable<'_>> {
        self.tables()
    }

    fn table_id(&self, node: LatexTable<'_>) -> Option<String> {
        self.label_of(&node)
    }

    fn table_data(&self, _node: LatexTable<'_>) -> Result<Option<TabularData>> {
        // Cell data comes from the converted view.
        Ok(None)
    }
}

fn collect_envs<'a, F>(node: &'a LatexNode, pred: &F, out: &mut Vec<&'a LatexNode>)
where
    F: Fn(&LatexNode) -> bool,
{
    if pred(node) {
        out.push(node);
    }
    for child in node.children() {
        collect_envs(child, pred, out);
    }
}

fn collect_tables<'a>(
    node: &'a LatexNode,
    float: Option<&'a LatexNode>,
    out: &mut Vec<LatexTable<'a>>,
) {
    if node.is_tabular() {
        out.push(LatexTable { node, float });
    }
    let float = if node.is_float() { Some(node) } else { float };
    for child in node.children() {
        collect_tables(child, float, out);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stop {
    Eof,
    Brace,
    End(String),
}

struct Reader<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Reader<'s> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn error(&self, at: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.src[..at].matches('\n').count() + 1,
            message: message.into(),
        }
    }

    fn nodes(&mut self, stop: Stop) -> std::result::Result<Vec<LatexNode>, SyntaxError> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        let start = self.pos;

        loop {
            let Some(c) = self.peek() else {
                flush_text(&mut text, &mut nodes);
                return match stop {
                    Stop::Eof => Ok(nodes),
                    Stop::Brace => Err(self.error(start, "unclosed '{'")),
                    Stop::End(name) => {
                        Err(self.error(start, format!("unclosed environment '{}'", name)))
                    }
                };
            };

            match c {
                '%' => self.skip_comment(),
                '{' => {
                    flush_text(&mut text, &mut nodes);
                    self.bump();
                    let children = self.nodes(Stop::Brace)?;
                    nodes.push(LatexNode::Group(children));
                }
                '}' => {
                    if stop == Stop::Brace {
                        self.bump();
                        flush_text(&mut text, &mut nodes);
                        return Ok(nodes);
                    }
                    return Err(self.error(self.pos, "unbalanced '}'"));
                }
                '$' => {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(self.dollar_math()?);
                }
                '\\' => {
                    flush_text(&mut text, &mut nodes);
                    let at = self.pos;
                    self.bump();
                    let name = self.control_name();
                    match name.as_str() {
                        "begin" => nodes.push(self.environment(at)?),
                        "end" => {
                            let env = self.braced_raw().unwrap_or_default();
                            if stop == Stop::End(env.clone()) {
                                return Ok(nodes);
                            }
                            return Err(self.error(at, format!("unexpected \\end{{{}}}", env)));
                        }
                        "(" => nodes.push(self.delimited_math(at, "\\)")?),
                        "[" => nodes.push(self.delimited_math(at, "\\]")?),
                        "" => text.push('\\'),
                        "%" | "$" | "&" | "#" | "_" | "{" | "}" => text.push_str(&name),
                        "verb" | "verb*" => nodes.push(self.verb(at, name)?),
                        n if URL_COMMANDS.contains(&n) => nodes.push(self.url_command(at, name)?),
                        n if DEFINITION_COMMANDS.contains(&n.trim_end_matches('*')) => {
                            nodes.push(self.definition(at, name)?)
                        }
                        _ => nodes.push(self.command(name)?),
                    }
                }
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn skip_comment(&mut self) {
        match self.rest().find('\n') {
            Some(offset) => self.pos += offset + 1,
            None => self.pos = self.src.len(),
        }
    }

    fn control_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() || c == '@' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            if let Some(c) = self.bump() {
                name.push(c);
            }
        } else if self.peek() == Some('*') && name != "begin" && name != "end" {
            name.push('*');
            self.bump();
        }
        name
    }

    fn command(&mut self, name: String) -> std::result::Result<LatexNode, SyntaxError> {
        let letters = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        let mut options = Vec::new();
        let mut args = Vec::new();

        loop {
            if letters {
                let skipped = self.rest().len() - self.rest().trim_start_matches([' ', '\t']).len();
                if self.rest()[skipped..].starts_with('{') {
                    self.pos += skipped;
                }
            }
            match self.peek() {
                Some('[') => match self.bracketed_raw() {
                    Some(opt) => options.push(opt),
                    None => break,
                },
                Some('{') => {
                    self.bump();
                    args.push(self.nodes(Stop::Brace)?);
                }
                _ => break,
            }
        }

        Ok(LatexNode::Command {
            name,
            options,
            args,
        })
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// `\verb<d>...<d>`: the body up to the next delimiter on the same line.
    fn verb(&mut self, at: usize, name: String) -> std::result::Result<LatexNode, SyntaxError> {
        let delim = self
            .bump()
            .filter(|c| !c.is_whitespace())
            .ok_or_else(|| self.error(at, "\\verb without a delimiter"))?;
        let line_end = self.rest().find('\n').unwrap_or(self.rest().len());
        let offset = self.rest()[..line_end]
            .find(delim)
            .ok_or_else(|| self.error(at, "unclosed \\verb"))?;
        let body = self.rest()[..offset].to_string();
        self.pos += offset + delim.len_utf8();
        Ok(LatexNode::Command {
            name,
            options: Vec::new(),
            args: vec![vec![LatexNode::Text(body)]],
        })
    }

    /// `\url{..}`, `\href{..}{text}`: the URL is raw, so `%` and `#` are literal.
    fn url_command(&mut self, at: usize, name: String) -> std::result::Result<LatexNode, SyntaxError> {
        self.skip_spaces();
        let url = self
            .braced_raw()
            .ok_or_else(|| self.error(at, format!("\\{} without an argument", name)))?;
        let mut args = vec![vec![LatexNode::Text(url)]];
        if let LatexNode::Command { args: rest, .. } = self.command(name.clone())? {
            args.extend(rest);
        }
        Ok(LatexNode::Command {
            name,
            options: Vec::new(),
            args,
        })
    }

    /// Macro and environment definitions. The defined name, parameter text
    /// and bodies are kept raw; bodies may hold unbalanced `\begin`/`\end`.
    fn definition(&mut self, at: usize, name: String) -> std::result::Result<LatexNode, SyntaxError> {
        let base = name.trim_end_matches('*');
        let incomplete = |r: &Self| r.error(at, format!("incomplete \\{} definition", name));
        let mut options = Vec::new();
        let mut args = Vec::new();

        self.skip_spaces();
        let defined = if self.peek() == Some('\\') {
            self.bump();
            format!("\\{}", self.control_name())
        } else {
            self.braced_raw().ok_or_else(|| incomplete(self))?
        };
        args.push(vec![LatexNode::Text(defined)]);

        let bodies = if base.ends_with("def") {
            // Parameter text such as `#1#2` runs up to the body.
            let offset = self.rest().find('{').ok_or_else(|| incomplete(self))?;
            let params = self.rest()[..offset].trim().to_string();
            if !params.is_empty() {
                options.push(params);
            }
            self.pos += offset;
            1
        } else if base.ends_with("environment") {
            2
        } else {
            1
        };

        loop {
            self.skip_spaces();
            match self.peek() {
                Some('[') => match self.bracketed_raw() {
                    Some(opt) => options.push(opt),
                    None => return Err(incomplete(self)),
                },
                _ => break,
            }
        }

        for _ in 0..bodies {
            self.skip_spaces();
            let body = self.braced_raw().ok_or_else(|| incomplete(self))?;
            args.push(vec![LatexNode::Text(body)]);
        }

        Ok(LatexNode::Command {
            name,
            options,
            args,
        })
    }

    fn environment(&mut self, at: usize) -> std::result::Result<LatexNode, SyntaxError> {
        let name = self
            .braced_raw()
            .ok_or_else(|| self.error(at, "\\begin without an environment name"))?;

        if VERBATIM_ENVIRONMENTS.contains(&name.as_str()) {
            let end = format!("\\end{{{}}}", name);
            let offset = self
                .rest()
                .find(&end)
                .ok_or_else(|| self.error(at, format!("unclosed environment '{}'", name)))?;
            let body = self.rest()[..offset].to_string();
            self.pos += offset + end.len();
            return Ok(LatexNode::Environment {
                name,
                args: Vec::new(),
                children: vec![LatexNode::Text(body)],
                span: at..self.pos,
            });
        }

        let mut args = Vec::new();
        loop {
            let arg = match self.peek() {
                Some('{') => self.braced_raw(),
                Some('[') => self.bracketed_raw(),
                _ => None,
            };
            match arg {
                Some(arg) => args.push(arg),
                None => break,
            }
        }

        let children = self.nodes(Stop::End(name.clone()))?;
        Ok(LatexNode::Environment {
            name,
            args,
            children,
            span: at..self.pos,
        })
    }

    /// Raw content of a `{...}` group at the cursor, honoring nesting.
    fn braced_raw(&mut self) -> Option<String> {
        self.raw_balanced('{', '}')
    }

    /// Raw content of a `[...]` group at the cursor.
    fn bracketed_raw(&mut self) -> Option<String> {
        self.raw_balanced('[', ']')
    }

    fn raw_balanced(&mut self, open: char, close: char) -> Option<String> {
        if self.peek() != Some(open) {
            return None;
        }
        let bytes = self.rest().as_bytes();
        let mut depth = 0usize;
        let mut braces = 0usize;
        let mut escaped = false;
        for (i, &b) in bytes.iter().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }
            match b {
                b'\\' => escaped = true,
                b'{' if open != '{' => braces += 1,
                b'}' if open != '{' => braces = braces.saturating_sub(1),
                _ if b == open as u8 && braces == 0 => depth += 1,
                _ if b == close as u8 && braces == 0 => {
                    depth -= 1;
                    if depth == 0 {
                        let content = self.rest()[1..i].to_string();
                        self.pos += i + 1;
                        return Some(content);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn dollar_math(&mut self) -> std::result::Result<LatexNode, SyntaxError> {
        let at = self.pos;
        let delim = if self.rest().starts_with("$$") { "$$" } else { "$" };
        self.pos += delim.len();
        let body = self.rest();
        let mut escaped = false;
        for (i, c) in body.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
            } else if body[i..].starts_with(delim) {
                self.pos += i + delim.len();
                return Ok(LatexNode::Math(self.src[at..self.pos].to_string()));
            }
        }
        Err(self.error(at, "unclosed math mode"))
    }

    fn delimited_math(
        &mut self,
        at: usize,
        close: &str,
    ) -> std::result::Result<LatexNode, SyntaxError> {
        let offset = self
            .rest()
            .find(close)
            .ok_or_else(|| self.error(at, "unclosed math mode"))?;
        self.pos += offset + close.len();
        Ok(LatexNode::Math(self.src[at..self.pos].to_string()))
    }
}

fn flush_text(text: &mut String, nodes: &mut Vec<LatexNode>) {
    if !text.is_empty() {
        nodes.push(LatexNode::Text(std::mem::take(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TABLES: &str = r"\documentclass{article}
\begin{document}
\section{Sets}
\begin{table}[h]
\centering
\begin{tabular}{|c|c|}
\hline
Name & Description \\
\hline
$I$ & facilities \\
\hline
\end{tabular}
\caption{Sets}
\label{tbl:sets}
\end{table}

\begin{tabular}{cc}
Name & Domain \\ % trailing comment \label{ignored}
$x$ & $\{0, 1\}$ \\
\end{tabular}
\end{document}
";

    #[test]
    fn test_find_tables_in_order() {
        let tree = LatexTree::parse(TWO_TABLES).unwrap();
        let tables = tree.tables();

        assert_eq!(tables.len(), 2);
        assert!(tables[0].float.is_some());
        assert!(tables[1].float.is_none());
        assert_eq!(tree.find_all("table").len(), 1);
        assert_eq!(tree.find_all("document").len(), 1);
    }

    #[test]
    fn test_float_label_attribution() {
        let tree = LatexTree::parse(TWO_TABLES).unwrap();
        let tables = tree.tables();

        assert_eq!(tree.label_of(&tables[0]), Some("tbl:sets".to_string()));
        assert_eq!(tree.label_of(&tables[1]), None);
    }

    #[test]
    fn test_inner_label_wins() {
        let source = r"\begin{table}
\label{tbl:outer}
\begin{tabular}{c}
\label{tbl:inner} a \\
\end{tabular}
\end{table}";
        let tree = LatexTree::parse(source).unwrap();
        let tables = tree.tables();
        assert_eq!(tree.label_of(&tables[0]), Some("tbl:inner".to_string()));
    }

    #[test]
    fn test_shared_float_label_not_attributed() {
        let source = r"\begin{table}
\begin{tabular}{c} a \\ \end{tabular}
\begin{tabular}{c} b \\ \end{tabular}
\caption{Two}\label{tbl:both}
\end{table}";
        let tree = LatexTree::parse(source).unwrap();
        let tables = tree.tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tree.label_of(&tables[0]), None);
        assert_eq!(tree.label_of(&tables[1]), None);
    }

    #[test]
    fn test_label_inside_caption() {
        let source = r"\begin{table}
\caption{Costs \label{ tbl:costs }}
\begin{tabular}{c} a \\ \end{tabular}
\end{table}";
        let tree = LatexTree::parse(source).unwrap();
        let tables = tree.tables();
        assert_eq!(tree.label_of(&tables[0]), Some("tbl:costs".to_string()));
    }

    #[test]
    fn test_commented_tabular_is_ignored() {
        let source = "% \\begin{tabular}{c} a \\\\ \\end{tabular}\n\\begin{tabular}{c} b \\\\ \\end{tabular}\n";
        let tree = LatexTree::parse(source).unwrap();
        assert_eq!(tree.tables().len(), 1);
    }

    #[test]
    fn test_escaped_percent_is_text() {
        let tree = LatexTree::parse(r"50\% of \textbf{cost}").unwrap();
        let text: String = tree.nodes().iter().map(LatexNode::text_content).collect();
        assert_eq!(text, "50% of cost");
    }

    #[test]
    fn test_row_count_skips_rules() {
        let tree = LatexTree::parse(TWO_TABLES).unwrap();
        let tables = tree.tables();
        assert_eq!(tables[0].row_count(), 2);
        assert_eq!(tables[1].row_count(), 2);

        let tree = LatexTree::parse(r"\begin{tabular}{c} a \\ b \end{tabular}").unwrap();
        assert_eq!(tree.tables()[0].row_count(), 2);
    }

    #[test]
    fn test_source_of_tabular() {
        let source = r"before \begin{tabular}{c} a \\ \end{tabular} after";
        let tree = LatexTree::parse(source).unwrap();
        let tables = tree.tables();
        assert_eq!(
            tree.source_of(tables[0].node),
            r"\begin{tabular}{c} a \\ \end{tabular}"
        );
        match tables[0].node {
            LatexNode::Environment { args, .. } => assert_eq!(args, &vec!["c".to_string()]),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_math_is_opaque() {
        let tree = LatexTree::parse(r"$\sum_{j \in J} c_j x_j$ and \(a}\)").unwrap();
        let maths: Vec<_> = tree
            .nodes()
            .iter()
            .filter(|n| matches!(n, LatexNode::Math(_)))
            .collect();
        assert_eq!(maths.len(), 2);
    }

    #[test]
    fn test_verbatim_body_is_raw() {
        let source = "\\begin{verbatim}\\begin{tabular} { \\end{verbatim}";
        let tree = LatexTree::parse(source).unwrap();
        assert!(tree.tables().is_empty());
        assert_eq!(tree.find_all("verbatim").len(), 1);
    }

    #[test]
    fn test_definitions_keep_raw_bodies() {
        let source = r"\newenvironment{boxed}{\begin{center}}{\end{center}}
\newcommand{\R}[1][+]{\mathbb{R}_{#1}}
\renewcommand*\vec[1]{\mathbf{#1}}
\def\pair#1#2{(#1, #2)}
\begin{tabular}{c} $\R$ \\ \end{tabular}";
        let tree = LatexTree::parse(source).unwrap();
        assert_eq!(tree.tables().len(), 1);

        match &tree.nodes()[0] {
            LatexNode::Command { name, args, .. } => {
                assert_eq!(name, "newenvironment");
                assert_eq!(args.len(), 3);
                assert_eq!(args[1], vec![LatexNode::Text(r"\begin{center}".to_string())]);
            }
            other => panic!("unexpected node: {:?}", other),
        }

        let defs: Vec<_> = tree
            .nodes()
            .iter()
            .filter_map(|n| match n {
                LatexNode::Command { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(defs, vec!["newenvironment", "newcommand", "renewcommand*", "def"]);
    }

    #[test]
    fn test_incomplete_definition() {
        let err = LatexTree::parse(r"\newcommand{\x}").unwrap_err();
        assert!(err.message.contains("incomplete"));
    }

    #[test]
    fn test_url_arguments_are_verbatim() {
        let source = r"\url{http://x.org/a%20b} and \href{http://x.org/#top}{the {top}}
\begin{tabular}{c} a \\ \end{tabular}";
        let tree = LatexTree::parse(source).unwrap();
        assert_eq!(tree.tables().len(), 1);

        match &tree.nodes()[0] {
            LatexNode::Command { name, args, .. } => {
                assert_eq!(name, "url");
                assert_eq!(args[0], vec![LatexNode::Text("http://x.org/a%20b".to_string())]);
            }
            other => panic!("unexpected node: {:?}", other),
        }
        let text: String = tree.nodes().iter().map(LatexNode::text_content).collect();
        assert!(text.contains("http://x.org/#topthe top"));
    }

    #[test]
    fn test_verb_reads_to_delimiter() {
        let tree = LatexTree::parse(r"\verb|{| and \verb*+}%+ done").unwrap();
        let text: String = tree.nodes().iter().map(LatexNode::text_content).collect();
        assert_eq!(text, "{ and }% done");

        let err = LatexTree::parse("\\verb|open\n|").unwrap_err();
        assert!(err.message.contains("unclosed \\verb"));
    }

    #[test]
    fn test_malformed_inputs() {
        let err = LatexTree::parse("\\begin{tabular}{c} a").unwrap_err();
        assert!(err.message.contains("unclosed environment 'tabular'"));

        let err = LatexTree::parse("a }").unwrap_err();
        assert!(err.message.contains("unbalanced"));

        let err = LatexTree::parse("line one\n{ open").unwrap_err();
        assert_eq!(err.line, 2);

        let err = LatexTree::parse("\\begin{table}\\end{tabular}").unwrap_err();
        assert!(err.message.contains("unexpected \\end{tabular}"));

        assert!(LatexTree::parse("$x").is_err());
    }
}
