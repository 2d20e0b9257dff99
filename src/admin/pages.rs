use crate::scoring::ScoreRecord;
use std::fmt::Write as _;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}\
         td,th{{border:1px solid #999;padding:4px 10px}}.notice{{color:#b00}}</style>\n\
         </head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn login_page() -> String {
    layout(
        "DodgeGame admin login",
        "<h1>Admin login</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <label>ID <input name=\"id\"></label>\n\
         <label>Password <input name=\"pw\" type=\"password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>",
    )
}

pub struct IndexView<'a> {
    pub season: Option<i64>,
    pub scores: &'a [ScoreRecord],
    pub notice: Option<&'a str>,
}

pub fn index_page(view: &IndexView<'_>) -> String {
    let mut body = String::new();
    body.push_str("<h1>DodgeGame admin</h1>\n<p><a href=\"/logout\">Log out</a></p>\n");

    if let Some(notice) = view.notice {
        let _ = writeln!(body, "<p class=\"notice\">{}</p>", escape(notice));
    }

    let season = view
        .season
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let _ = writeln!(body, "<h2>Season {season}</h2>");
    body.push_str(
        "<form method=\"post\" action=\"/set-season\">\n\
         <input name=\"season\" type=\"number\" min=\"1\">\n\
         <button type=\"submit\">Set season</button>\n</form>\n",
    );

    body.push_str(
        "<h2>Set score</h2>\n<form method=\"post\" action=\"/set-score\">\n\
         <input name=\"player_id\" placeholder=\"Student ID\">\n\
         <input name=\"time\" type=\"number\" min=\"0\" placeholder=\"Time score\">\n\
         <input name=\"action\" type=\"number\" min=\"0\" placeholder=\"Action score\">\n\
         <button type=\"submit\">Save</button>\n</form>\n",
    );

    body.push_str(
        "<h2>Scores</h2>\n<form method=\"post\" action=\"/get-score\">\n\
         <button type=\"submit\">Refresh</button>\n</form>\n",
    );
    if view.scores.is_empty() {
        body.push_str("<p>No scores loaded.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>#</th><th>Student</th><th>Time</th><th>Action</th><th>Overall</th></tr>\n",
        );
        for (rank, record) in view.scores.iter().enumerate() {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                rank + 1,
                escape(&record.student_id),
                record.time_score,
                record.action_score,
                record.overall_score
            );
        }
        body.push_str("</table>\n");
    }
    layout("DodgeGame admin", &body)
}
