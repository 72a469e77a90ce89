#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Blob(Vec<u8>),
    /// `?` placeholder.
    Param,
    LParen,
    RParen,
    Comma,
    Star,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Keyword(Keyword),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    As,
    Asc,
    Autoincrement,
    Blob,
    By,
    Count,
    Create,
    Default,
    Delete,
    Desc,
    Distinct,
    Drop,
    Exists,
    False,
    From,
    If,
    In,
    Insert,
    Integer,
    Into,
    Is,
    Key,
    Limit,
    Not,
    Null,
    Or,
    Order,
    Primary,
    Real,
    References,
    Select,
    Set,
    Table,
    Text,
    True,
    Update,
    Values,
    Where,
}

impl Keyword {
    /// Case insensitive keyword lookup for a bare word.
    pub fn lookup(word: &str) -> Option<Keyword> {
        Some(match word.to_ascii_uppercase().as_str() {
            "AND" => Keyword::And,
            "AS" => Keyword::As,
            "ASC" => Keyword::Asc,
            "AUTOINCREMENT" => Keyword::Autoincrement,
            "BLOB" => Keyword::Blob,
            "BY" => Keyword::By,
            "COUNT" => Keyword::Count,
            "CREATE" => Keyword::Create,
            "DEFAULT" => Keyword::Default,
            "DELETE" => Keyword::Delete,
            "DESC" => Keyword::Desc,
            "DISTINCT" => Keyword::Distinct,
            "DROP" => Keyword::Drop,
            "EXISTS" => Keyword::Exists,
            "FALSE" => Keyword::False,
            "FROM" => Keyword::From,
            "IF" => Keyword::If,
            "IN" => Keyword::In,
            "INSERT" => Keyword::Insert,
            "INTEGER" => Keyword::Integer,
            "INTO" => Keyword::Into,
            "IS" => Keyword::Is,
            "KEY" => Keyword::Key,
            "LIMIT" => Keyword::Limit,
            "NOT" => Keyword::Not,
            "NULL" => Keyword::Null,
            "OR" => Keyword::Or,
            "ORDER" => Keyword::Order,
            "PRIMARY" => Keyword::Primary,
            "REAL" => Keyword::Real,
            "REFERENCES" => Keyword::References,
            "SELECT" => Keyword::Select,
            "SET" => Keyword::Set,
            "TABLE" => Keyword::Table,
            "TEXT" => Keyword::Text,
            "TRUE" => Keyword::True,
            "UPDATE" => Keyword::Update,
            "VALUES" => Keyword::Values,
            "WHERE" => Keyword::Where,
            _ => return None,
        })
    }
}
