//! HTML rendering for the operator-facing pages.
//!
//! Two small server-rendered pages: the upload form and the record list.
//! Flash messages arrive as `?level=&msg=` query parameters set by the
//! redirecting handler.

use platelog_core::PlateRecord;

/// A flash banner carried across a redirect: `(level, message)`, where
/// level is `"ok"` or `"error"`.
pub type Flash = (String, String);

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_banner(flash: &Option<Flash>) -> String {
    match flash {
        Some((level, msg)) => {
            let class = if level == "error" { "flash error" } else { "flash ok" };
            format!(
                r#"<div class="{}">{}</div>"#,
                class,
                escape_html(msg)
            )
        }
        None => String::new(),
    }
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body {{ font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; color: #222; }}
  h1 {{ font-size: 1.4rem; }}
  .flash {{ padding: .6rem 1rem; border-radius: 4px; margin-bottom: 1rem; }}
  .flash.ok {{ background: #e6f4ea; border: 1px solid #34a853; }}
  .flash.error {{ background: #fce8e6; border: 1px solid #ea4335; }}
  form label {{ display: block; margin-top: .8rem; font-weight: 600; }}
  input[type=text], textarea {{ width: 100%; padding: .4rem; }}
  button {{ margin-top: 1rem; padding: .5rem 1.2rem; }}
  table {{ border-collapse: collapse; width: 100%; }}
  th, td {{ border: 1px solid #ccc; padding: .4rem .6rem; text-align: left; }}
  nav {{ margin-bottom: 1rem; }}
  nav a {{ margin-right: 1rem; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// The upload form.
pub fn index_page(flash: &Option<Flash>) -> String {
    let body = format!(
        r#"<h1>Registro de matrículas</h1>
<nav><a href="/registros">Ver registros</a></nav>
{}
<form action="/guardar" method="post" enctype="multipart/form-data">
  <label for="imagen">Imagen de la matrícula</label>
  <input type="file" id="imagen" name="imagen" accept="image/*">
  <label for="propietario">Propietario</label>
  <input type="text" id="propietario" name="propietario">
  <label for="tipo_vehiculo">Tipo de vehículo</label>
  <input type="text" id="tipo_vehiculo" name="tipo_vehiculo">
  <label for="observacion">Observación</label>
  <textarea id="observacion" name="observacion" rows="3"></textarea>
  <button type="submit">Guardar</button>
</form>"#,
        flash_banner(flash)
    );
    page_shell("Registro de matrículas", &body)
}

/// The record list.
pub fn records_page(records: &[PlateRecord], flash: &Option<Flash>) -> String {
    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                r#"<tr>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td><a href="/uploads/{}">ver</a></td>
  <td><a href="/eliminar/{}">eliminar</a></td>
</tr>"#,
                r.id,
                escape_html(&r.captured_at),
                escape_html(&r.plate_text),
                escape_html(&r.owner),
                escape_html(&r.vehicle_type),
                escape_html(&r.note),
                escape_html(&r.image_filename),
                r.id
            )
        })
        .collect();

    let table = if records.is_empty() {
        "<p>Sin registros.</p>".to_string()
    } else {
        format!(
            r#"<table>
<tr><th>Id</th><th>Fecha y hora</th><th>Matrícula</th><th>Propietario</th><th>Tipo</th><th>Observación</th><th>Imagen</th><th></th></tr>
{rows}
</table>"#
        )
    };

    let body = format!(
        r#"<h1>Registros</h1>
<nav><a href="/">Nuevo registro</a> <a href="/descargar">Descargar CSV</a></nav>
{}
{}"#,
        flash_banner(flash),
        table
    );
    page_shell("Registros", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, plate: &str) -> PlateRecord {
        PlateRecord {
            id,
            captured_at: "2026-08-06 10:00:00".to_string(),
            plate_text: plate.to_string(),
            owner: "Ana".to_string(),
            vehicle_type: "coche".to_string(),
            note: "".to_string(),
            image_filename: format!("plate_{id}.jpg"),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>&"x"'</b>"#),
            "&lt;b&gt;&amp;&quot;x&quot;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_index_page_has_form_fields() {
        let html = index_page(&None);
        for needle in [
            r#"action="/guardar""#,
            r#"name="imagen""#,
            r#"name="propietario""#,
            r#"name="tipo_vehiculo""#,
            r#"name="observacion""#,
            "multipart/form-data",
        ] {
            assert!(html.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_flash_banner_rendering() {
        let html = index_page(&Some(("error".to_string(), "Debes subir una imagen".to_string())));
        assert!(html.contains(r#"class="flash error""#));
        assert!(html.contains("Debes subir una imagen"));
    }

    #[test]
    fn test_records_page_lists_rows_and_links() {
        let records = vec![record(1, "ABC-123"), record(2, "NOT_DETECTED")];
        let html = records_page(&records, &None);
        assert!(html.contains("ABC-123"));
        assert!(html.contains("/uploads/plate_1.jpg"));
        assert!(html.contains("/eliminar/2"));
    }

    #[test]
    fn test_records_page_escapes_operator_text() {
        let mut r = record(1, "ABC-123");
        r.owner = "<script>alert(1)</script>".to_string();
        let html = records_page(&[r], &None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_records_page() {
        let html = records_page(&[], &None);
        assert!(html.contains("Sin registros"));
    }
}
