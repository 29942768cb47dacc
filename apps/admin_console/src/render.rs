use std::fmt::Write as _;

use shared::protocol::{SpecialtySummary, UserSummary};

pub fn specialty_table(records: &[SpecialtySummary]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|s| vec![s.especialidade_id.to_string(), s.especialidade_nome.clone()])
        .collect();
    table(&["ID", "Nome"], &rows)
}

pub fn user_table(records: &[UserSummary]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|u| {
            vec![
                u.usuario_id.to_string(),
                u.usuario_nome.clone(),
                u.usuario_email.clone(),
            ]
        })
        .collect();
    table(&["ID", "Nome", "E-mail"], &rows)
}

/// Left-aligned columns padded to the widest cell, two spaces apart.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &widths, &header);
    for row in rows {
        write_row(&mut out, &widths, row);
    }
    if rows.is_empty() {
        out.push_str("(nenhum registro)\n");
    }
    out
}

fn write_row(out: &mut String, widths: &[usize], cells: &[String]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use shared::domain::{SpecialtyId, UserId};

    use super::*;

    #[test]
    fn pads_columns_to_widest_cell() {
        let out = user_table(&[
            UserSummary {
                usuario_id: UserId(1),
                usuario_nome: "Ana".into(),
                usuario_email: "ana@clinica.com".into(),
            },
            UserSummary {
                usuario_id: UserId(12),
                usuario_nome: "Bruno Lima".into(),
                usuario_email: "bruno@clinica.com".into(),
            },
        ]);

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "ID  Nome        E-mail");
        assert_eq!(lines[1], "1   Ana         ana@clinica.com");
        assert_eq!(lines[2], "12  Bruno Lima  bruno@clinica.com");
    }

    #[test]
    fn empty_collection_is_marked() {
        let out = specialty_table(&[]);
        assert_eq!(out, "ID  Nome\n(nenhum registro)\n");
    }

    #[test]
    fn accented_names_align_by_character() {
        let out = specialty_table(&[SpecialtySummary {
            especialidade_id: SpecialtyId(3),
            especialidade_nome: "Ginecologia e Obstetrícia".into(),
        }]);
        assert_eq!(out.lines().nth(1), Some("3   Ginecologia e Obstetrícia"));
    }
}
