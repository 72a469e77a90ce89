use super::{
    ColumnMeta, Database, EvalContext, SelectItem, SelectStmt, Source, SqlExpr, Stmt, TableData,
    Truth, compare_for_sort, eval_predicate, eval_scalar, normalize,
};
use anyhow::{Result, bail};
use quarry_core::{QueryResult, RowLabeled, RowsAffected, Value};
use std::sync::Arc;

/// Execute one parsed statement against the database, materializing every
/// result. Statements within one transaction arrive here strictly in
/// submission order.
pub fn execute(db: &mut Database, stmt: &Stmt, params: &[Value]) -> Result<Vec<QueryResult>> {
    match stmt {
        Stmt::CreateTable {
            name,
            if_not_exists,
            columns,
        } => {
            if db.tables.contains_key(name) {
                if *if_not_exists {
                    return Ok(vec![RowsAffected::default().into()]);
                }
                bail!("table {} already exists", name);
            }
            let columns = columns
                .iter()
                .map(|spec| ColumnMeta {
                    name: spec.name.clone(),
                    ty: spec.ty,
                    not_null: spec.not_null,
                    primary_key: spec.primary_key,
                    auto_increment: spec.auto_increment,
                    default: spec.default.clone(),
                })
                .collect();
            db.tables.insert(
                name.clone(),
                TableData {
                    name: name.clone(),
                    columns,
                    rows: Vec::new(),
                    next_rowid: 1,
                },
            );
            Ok(vec![RowsAffected::default().into()])
        }
        Stmt::DropTable { name, if_exists } => {
            if db.tables.remove(name).is_none() && !if_exists {
                bail!("no such table: {}", name);
            }
            Ok(vec![RowsAffected::default().into()])
        }
        Stmt::Insert {
            table,
            columns,
            values,
        } => insert(db, table, columns, values, params),
        Stmt::Update {
            table,
            sets,
            predicate,
        } => update(db, table, sets, predicate.as_ref(), params),
        Stmt::Delete { table, predicate } => delete(db, table, predicate.as_ref(), params),
        Stmt::Select(select) => {
            let (labels, rows) = exec_select(db, select, params)?;
            Ok(rows
                .into_iter()
                .map(|values| RowLabeled::new(labels.clone(), values).into())
                .collect())
        }
    }
}

fn insert(
    db: &mut Database,
    table: &str,
    columns: &[String],
    values: &[SqlExpr],
    params: &[Value],
) -> Result<Vec<QueryResult>> {
    let provided = {
        let ctx = EvalContext::rowless(db, params);
        columns
            .iter()
            .zip(values)
            .map(|(name, expr)| Ok((name.clone(), eval_scalar(expr, &ctx)?)))
            .collect::<Result<Vec<_>>>()?
    };
    let Some(table) = db.tables.get_mut(table) else {
        bail!("no such table: {}", table);
    };
    let mut row = vec![Value::Null; table.columns.len()];
    for (name, value) in provided {
        let Some(index) = table.column_index(&name) else {
            bail!("table {} has no column {}", table.name, name);
        };
        row[index] = normalize(table.columns[index].ty, value)?;
    }
    let mut last_affected_id = None;
    for (index, meta) in table.columns.iter().enumerate() {
        if row[index].is_null() {
            if meta.auto_increment {
                row[index] = Value::Int64(Some(table.next_rowid));
            } else if let Some(default) = &meta.default {
                row[index] = normalize(meta.ty, default.clone())?;
            }
        }
        if meta.auto_increment {
            if let Value::Int64(Some(id)) = &row[index] {
                last_affected_id = Some(*id);
            }
        }
        if row[index].is_null() && meta.not_null {
            bail!("NOT NULL constraint failed: {}.{}", table.name, meta.name);
        }
    }
    if let Some(id) = last_affected_id {
        table.next_rowid = table.next_rowid.max(id + 1);
    }
    if let Some(pk) = table.columns.iter().position(|c| c.primary_key) {
        if !row[pk].is_null() && table.rows.iter().any(|existing| existing[pk] == row[pk]) {
            bail!(
                "UNIQUE constraint failed: {}.{}",
                table.name,
                table.columns[pk].name,
            );
        }
    }
    table.rows.push(row.into_boxed_slice());
    Ok(vec![
        RowsAffected {
            rows_affected: 1,
            last_affected_id,
        }
        .into(),
    ])
}

/// Indices of the rows a predicate matches, evaluated before any mutation so
/// sub-queries observe a consistent state.
fn matching_indices(
    db: &Database,
    table: &str,
    predicate: Option<&SqlExpr>,
    params: &[Value],
) -> Result<Vec<usize>> {
    let Some(data) = db.tables.get(table) else {
        bail!("no such table: {}", table);
    };
    let labels = data.labels();
    let mut indices = Vec::new();
    for (index, row) in data.rows.iter().enumerate() {
        let matched = match predicate {
            None => true,
            Some(predicate) => {
                let ctx = EvalContext {
                    db,
                    params,
                    labels: &labels,
                    row,
                };
                eval_predicate(predicate, &ctx)? == Truth::True
            }
        };
        if matched {
            indices.push(index);
        }
    }
    Ok(indices)
}

fn update(
    db: &mut Database,
    table: &str,
    sets: &[(String, SqlExpr)],
    predicate: Option<&SqlExpr>,
    params: &[Value],
) -> Result<Vec<QueryResult>> {
    let indices = matching_indices(db, table, predicate, params)?;
    let assignments = {
        let ctx = EvalContext::rowless(db, params);
        sets.iter()
            .map(|(name, expr)| Ok((name.clone(), eval_scalar(expr, &ctx)?)))
            .collect::<Result<Vec<_>>>()?
    };
    let data = db.tables.get_mut(table).expect("table resolved above");
    for &row_index in &indices {
        for (name, value) in &assignments {
            let Some(column) = data.column_index(name) else {
                bail!("table {} has no column {}", data.name, name);
            };
            let value = normalize(data.columns[column].ty, value.clone())?;
            if value.is_null() && data.columns[column].not_null {
                bail!(
                    "NOT NULL constraint failed: {}.{}",
                    data.name,
                    data.columns[column].name,
                );
            }
            data.rows[row_index][column] = value;
        }
    }
    Ok(vec![
        RowsAffected {
            rows_affected: indices.len() as u64,
            last_affected_id: None,
        }
        .into(),
    ])
}

fn delete(
    db: &mut Database,
    table: &str,
    predicate: Option<&SqlExpr>,
    params: &[Value],
) -> Result<Vec<QueryResult>> {
    let indices = matching_indices(db, table, predicate, params)?;
    let data = db.tables.get_mut(table).expect("table resolved above");
    let mut index = 0;
    data.rows.retain(|_| {
        let remove = indices.contains(&index);
        index += 1;
        !remove
    });
    Ok(vec![
        RowsAffected {
            rows_affected: indices.len() as u64,
            last_affected_id: None,
        }
        .into(),
    ])
}

/// Run a SELECT to completion: labels plus materialized rows.
pub fn exec_select(
    db: &Database,
    select: &SelectStmt,
    params: &[Value],
) -> Result<(Arc<[String]>, Vec<Box<[Value]>>)> {
    let (source_labels, source_rows) = match &select.source {
        Source::Table(name) => {
            let Some(data) = db.tables.get(name) else {
                bail!("no such table: {}", name);
            };
            (data.labels(), data.rows.clone())
        }
        Source::SubSelect(inner) => {
            let (labels, rows) = exec_select(db, inner, params)?;
            (labels.to_vec(), rows)
        }
    };
    let mut filtered = Vec::new();
    for row in source_rows {
        let matched = match &select.predicate {
            None => true,
            Some(predicate) => {
                let ctx = EvalContext {
                    db,
                    params,
                    labels: &source_labels,
                    row: &row,
                };
                eval_predicate(predicate, &ctx)? == Truth::True
            }
        };
        if matched {
            filtered.push(row);
        }
    }
    if select
        .items
        .iter()
        .any(|item| matches!(item, SelectItem::CountStar))
    {
        if select.items.len() != 1 {
            bail!("COUNT(*) cannot be combined with other projection items");
        }
        let labels: Arc<[String]> = Arc::from(vec!["COUNT(*)".to_string()]);
        let row: Box<[Value]> = Box::from(vec![Value::Int64(Some(filtered.len() as i64))]);
        return Ok((labels, vec![row]));
    }
    if !select.order.is_empty() {
        let keys = select
            .order
            .iter()
            .map(|(name, ascending)| {
                match source_labels.iter().position(|label| label == name) {
                    Some(index) => Ok((index, *ascending)),
                    None => bail!("no such column: {}", name),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        filtered.sort_by(|a, b| {
            for &(index, ascending) in &keys {
                let ordering = compare_for_sort(&a[index], &b[index]);
                let ordering = if ascending { ordering } else { ordering.reverse() };
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });
    }
    let mut labels = Vec::with_capacity(select.items.len());
    let mut projections = Vec::with_capacity(select.items.len());
    for item in &select.items {
        match item {
            SelectItem::Column(name) => {
                match source_labels.iter().position(|label| label == name) {
                    Some(index) => {
                        labels.push(name.clone());
                        projections.push(Projection::Column(index));
                    }
                    None => bail!("no such column: {}", name),
                }
            }
            SelectItem::Literal(value) => {
                labels.push("1".to_string());
                projections.push(Projection::Literal(value.clone()));
            }
            SelectItem::CountStar => unreachable!("handled above"),
        }
    }
    let mut rows: Vec<Box<[Value]>> = filtered
        .iter()
        .map(|row| {
            projections
                .iter()
                .map(|projection| match projection {
                    Projection::Column(index) => row[*index].clone(),
                    Projection::Literal(value) => value.clone(),
                })
                .collect()
        })
        .collect();
    if select.distinct {
        let mut unique: Vec<Box<[Value]>> = Vec::with_capacity(rows.len());
        for row in rows {
            if !unique.contains(&row) {
                unique.push(row);
            }
        }
        rows = unique;
    }
    if let Some(limit) = select.limit {
        rows.truncate(limit as usize);
    }
    Ok((Arc::from(labels), rows))
}

enum Projection {
    Column(usize),
    Literal(Value),
}
