use crate::{
    AsValue, Column, ColumnDef, ColumnRef, Delete, Driver, Executor, Expr, Insert, Query, Result,
    SchemaError, Select, SqlWriter, Update, Value,
};
use std::{collections::HashSet, sync::Arc};

/// Immutable description of a relation: a name and an ordered sequence of
/// columns. Declared once at startup, shared by handle afterwards.
#[derive(Debug, Clone)]
pub struct Table {
    inner: Arc<TableInner>,
}

#[derive(Debug)]
struct TableInner {
    name: Arc<str>,
    columns: Vec<Arc<ColumnDef>>,
}

impl Table {
    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            name: Arc::from(name.into()),
            columns: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn columns(&self) -> &[Arc<ColumnDef>] {
        &self.inner.columns
    }

    pub fn primary_key(&self) -> Option<&Arc<ColumnDef>> {
        self.inner.columns.iter().find(|c| c.primary_key)
    }

    /// The auto generated identity column, if one was declared.
    pub fn identity(&self) -> Option<&Arc<ColumnDef>> {
        self.inner.columns.iter().find(|c| c.auto_increment)
    }

    pub fn contains(&self, column: &ColumnRef) -> bool {
        column.table == self.inner.name
            && self.inner.columns.iter().any(|c| c.column_ref == *column)
    }

    /// Rows matching the predicate.
    pub fn select(&self, predicate: Expr) -> Select {
        Select::new(self.clone(), Some(predicate))
    }

    /// Every row of the table.
    pub fn select_all(&self) -> Select {
        Select::new(self.clone(), None)
    }

    pub fn insert(&self) -> Insert {
        Insert::new(self.clone())
    }

    pub fn update(&self, predicate: Expr) -> Update {
        Update::new(self.clone(), Some(predicate))
    }

    pub fn update_all(&self) -> Update {
        Update::new(self.clone(), None)
    }

    pub fn delete(&self, predicate: Expr) -> Delete {
        Delete::new(self.clone(), Some(predicate))
    }

    pub fn delete_all(&self) -> Delete {
        Delete::new(self.clone(), None)
    }

    /// Create the relation from its declared metadata.
    pub async fn create_table<E: Executor>(
        &self,
        executor: &mut E,
        if_not_exists: bool,
    ) -> Result<()> {
        let writer = executor.driver().sql_writer();
        let mut sql = String::with_capacity(256);
        writer.write_create_table(&mut sql, self, if_not_exists)?;
        executor.execute(Query::Raw(sql.into())).await?;
        Ok(())
    }

    pub async fn drop_table<E: Executor>(&self, executor: &mut E, if_exists: bool) -> Result<()> {
        let writer = executor.driver().sql_writer();
        let mut sql = String::with_capacity(64);
        writer.write_drop_table(&mut sql, self, if_exists);
        executor.execute(Query::Raw(sql.into())).await?;
        Ok(())
    }
}

/// Collects column declarations for [`Table::builder`].
///
/// Columns are declared through [`TableBuilder::column`], which returns a
/// chainable [`ColumnBuilder`]; its `take` mints the typed [`Column`] handle
/// used by the expression algebra. `build` validates the whole declaration
/// and fails with [`SchemaError`] on malformed schemas. No I/O happens here.
pub struct TableBuilder {
    name: Arc<str>,
    columns: Vec<Arc<ColumnDef>>,
    // Targets of declared references, kept aside for build time validation.
    references: Vec<(ColumnRef, Arc<ColumnDef>)>,
}

impl TableBuilder {
    pub fn column<T: AsValue>(&mut self, name: impl Into<String>) -> ColumnBuilder<'_, T> {
        let def = ColumnDef {
            column_ref: ColumnRef {
                name: Arc::from(name.into()),
                table: self.name.clone(),
            },
            value: T::as_empty_value(),
            nullable: T::NULLABLE,
            primary_key: false,
            auto_increment: false,
            default: None,
            references: None,
        };
        ColumnBuilder {
            builder: self,
            def,
            marker: std::marker::PhantomData,
        }
    }

    pub fn build(self) -> Result<Table> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name().to_string()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.to_string(),
                    column: column.name().to_string(),
                }
                .into());
            }
        }
        if self.columns.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(SchemaError::MultiplePrimaryKeys {
                table: self.name.to_string(),
            }
            .into());
        }
        for column in &self.columns {
            if column.auto_increment
                && !matches!(
                    column.value,
                    Value::Int16(..) | Value::Int32(..) | Value::Int64(..)
                )
            {
                return Err(SchemaError::IdentityNotInteger {
                    table: self.name.to_string(),
                    column: column.name().to_string(),
                }
                .into());
            }
        }
        for (source, target) in &self.references {
            if !target.primary_key {
                return Err(SchemaError::ReferenceNotPrimaryKey {
                    table: source.table.to_string(),
                    column: source.name.to_string(),
                    target_table: target.table().to_string(),
                    target_column: target.name().to_string(),
                }
                .into());
            }
        }
        Ok(Table {
            inner: Arc::new(TableInner {
                name: self.name,
                columns: self.columns,
            }),
        })
    }
}

/// Chainable declaration of a single column.
pub struct ColumnBuilder<'b, T> {
    builder: &'b mut TableBuilder,
    def: ColumnDef,
    marker: std::marker::PhantomData<fn() -> T>,
}

impl<'b, T: AsValue> ColumnBuilder<'b, T> {
    pub fn primary_key(mut self) -> Self {
        self.def.primary_key = true;
        self
    }

    /// Auto generated integer identity, assigned by the database at insert
    /// time. Implies `primary_key`.
    pub fn auto_increment(mut self) -> Self {
        self.def.auto_increment = true;
        self.def.primary_key = true;
        self
    }

    pub fn default_value(mut self, value: T) -> Self {
        self.def.default = Some(value.as_value());
        self
    }

    /// Declare a foreign key to another table's primary key. The nullability
    /// of this column is independent of the referenced column's.
    pub fn references<U>(mut self, target: &Column<U>) -> Self {
        self.def.references = Some(target.def.column_ref.clone());
        self.builder
            .references
            .push((self.def.column_ref.clone(), target.def.clone()));
        self
    }

    /// Register the column and return its typed handle.
    pub fn take(self) -> Column<T> {
        let def = Arc::new(self.def);
        self.builder.columns.push(def.clone());
        Column::new(def)
    }
}
