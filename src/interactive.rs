//! Line-oriented session that walks through the login, register and
//! student form screens.

use std::io::{self, BufRead, Write};

use crate::decline;
use crate::form::{ParseMode, Submission};
use crate::mailer::{Mailer, NoticeEmail, SEND_FAILED_MESSAGE};
use crate::models::Subject;
use crate::notice;
use crate::report;
use crate::session::{RegisterForm, Session, UserStore};
use crate::suggest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Register,
    Main,
}

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}

pub async fn run<R: BufRead, W: Write>(
    input: R,
    output: W,
    mailer: &Mailer,
    mode: ParseMode,
) -> anyhow::Result<()> {
    let mut console = Console { input, output };
    let mut store = UserStore::new();
    let mut session: Option<Session> = None;
    let mut screen = Screen::Login;

    console.say("SCHOLAR LENS")?;

    loop {
        match screen {
            Screen::Login => {
                let Some(command) = console.prompt("Command [login/register/quit]")? else {
                    break;
                };
                match command.trim().to_lowercase().as_str() {
                    "login" => {
                        let Some(email) = console.prompt("Email")? else { break };
                        let Some(password) = console.prompt("Password")? else { break };
                        match store.login(&email, &password) {
                            Ok(new_session) => {
                                tracing::info!(user_id = %new_session.user.id, "session started");
                                console.say(&format!(
                                    "Welcome, {} ({})! Logged in at {}.",
                                    new_session.user.name,
                                    new_session.user.email,
                                    new_session.logged_in_at.format("%H:%M UTC")
                                ))?;
                                if !mailer.is_configured() {
                                    console.say("EmailJS is not configured; notices can be previewed but not sent.")?;
                                }
                                session = Some(new_session);
                                screen = Screen::Main;
                            }
                            Err(error) => console.say(&format!("! {error}"))?,
                        }
                    }
                    "register" => screen = Screen::Register,
                    "quit" => break,
                    other => console.say(&format!("! unknown command {other:?}"))?,
                }
            }
            Screen::Register => {
                let Some(form) = read_register_form(&mut console)? else { break };
                match store.register(form) {
                    Ok(_) => {
                        console.say("Account created. Please log in.")?;
                        screen = Screen::Login;
                    }
                    Err(error) => {
                        console.say(&format!("! {error}"))?;
                        screen = Screen::Login;
                    }
                }
            }
            Screen::Main => {
                let Some(command) = console.prompt("Command [form/logout/quit]")? else {
                    break;
                };
                match command.trim().to_lowercase().as_str() {
                    "form" => {
                        let session_name = session.as_ref().map(Session::current_student_name);
                        let Some(submission) = read_submission(&mut console, session_name)? else {
                            break;
                        };
                        if !handle_submission(&mut console, &submission, session_name, mailer, mode)
                            .await?
                        {
                            break;
                        }
                    }
                    "logout" => {
                        session = None;
                        screen = Screen::Login;
                    }
                    "quit" => break,
                    other => console.say(&format!("! unknown command {other:?}"))?,
                }
            }
        }
    }

    console.say("Goodbye.")?;
    Ok(())
}

fn read_register_form<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> io::Result<Option<RegisterForm>> {
    let Some(name) = console.prompt("Name")? else { return Ok(None) };
    let Some(email) = console.prompt("Email")? else { return Ok(None) };
    let Some(password) = console.prompt("Password")? else { return Ok(None) };
    let Some(password_confirmation) = console.prompt("Confirm password")? else {
        return Ok(None);
    };
    Ok(Some(RegisterForm {
        name,
        email,
        password,
        password_confirmation,
    }))
}

fn read_submission<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session_name: Option<&str>,
) -> io::Result<Option<Submission>> {
    let name_label = match session_name {
        Some(name) => format!("Student name [{name}]"),
        None => "Student name".to_string(),
    };

    let mut submission = Submission::default();
    let fields: [(&str, &mut String); 5] = [
        (name_label.as_str(), &mut submission.name),
        ("Gender [Male/Female/Other]", &mut submission.gender),
        ("Absence days", &mut submission.absences),
        ("Weekly study hours", &mut submission.study_hours),
        ("Extracurricular activities [Yes/No]", &mut submission.activities),
    ];
    for (label, slot) in fields {
        let Some(value) = console.prompt(label)? else { return Ok(None) };
        *slot = value;
    }

    for (subject, slot) in Subject::ALL.iter().zip(submission.scores.iter_mut()) {
        let Some(value) = console.prompt(&format!("{subject} score"))? else {
            return Ok(None);
        };
        *slot = value;
    }

    let Some(parent_email) = console.prompt("Parent email")? else { return Ok(None) };
    submission.parent_email = parent_email;

    Ok(Some(submission))
}

/// Returns `false` when input ran out mid-way.
async fn handle_submission<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    submission: &Submission,
    session_name: Option<&str>,
    mailer: &Mailer,
    mode: ParseMode,
) -> anyhow::Result<bool> {
    let validated = match submission.parse(mode, session_name) {
        Ok(validated) => validated,
        Err(error) => {
            console.say(&format!("! {error}"))?;
            return Ok(true);
        }
    };

    let record = &validated.record;
    let result = suggest::assess(record);
    let reasons = decline::evaluate_with_reasons(record);
    tracing::info!(
        student = %record.student_name,
        gender = ?validated.gender,
        declining = result.is_declining,
        "evaluated submission"
    );
    console.say(&report::render_assessment(record, &result, &reasons))?;

    let Some(message_html) = notice::notice_for(record, &result) else {
        return Ok(true);
    };
    console.say("Parent notice preview:")?;
    console.say(&message_html)?;

    let Some(answer) =
        console.prompt(&format!("Send notice to {}? [y/N]", validated.parent_email))?
    else {
        return Ok(false);
    };
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(true);
    }

    let email = NoticeEmail {
        to_email: validated.parent_email.clone(),
        to_name: record.student_name.clone(),
        message_html,
    };
    match mailer.send(&email).await {
        Ok(()) => console.say("Email sent to parent!")?,
        Err(error) => {
            tracing::error!(%error, "failed to send notice email");
            console.say(SEND_FAILED_MESSAGE)?;
        }
    }

    Ok(true)
}
