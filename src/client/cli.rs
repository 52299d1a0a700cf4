use super::ApiClient;
use super::Login;
use super::PostView;
use super::SessionManager;
use super::Vault;
use crate::auth::Account;
use crate::core::ID;
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Password;
use std::io::Write;

/// Where the client points when SERVER_URL is unset.
const SERVER_URL: &str = "http://localhost:3000";
/// Posts shown per `feed` command.
const PAGE: i64 = 8;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
enum Visit {
    #[command(about = "Sign in with email and password", alias = "in")]
    Login,
    #[command(about = "Sign in with a pasted Google ID token", alias = "goog")]
    Google,
    #[command(about = "End the session here and on the server", alias = "out")]
    Logout,
    #[command(about = "Show who is signed in", alias = "who")]
    Whoami,
    #[command(about = "Look up a user's public profile")]
    Profile {
        #[arg(required = true)]
        user: String,
    },
    #[command(about = "Show the latest posts", alias = "ls")]
    Feed,
    #[command(about = "Read one post with its like tally", alias = "cat")]
    Read {
        #[arg(required = true)]
        post: String,
    },
    #[command(about = "Write and publish a post", alias = "pub")]
    Publish,
    #[command(about = "Like a post")]
    Like {
        #[arg(required = true)]
        post: String,
    },
    #[command(about = "Take a like back")]
    Unlike {
        #[arg(required = true)]
        post: String,
    },
    #[command(about = "Have the server draft a post in your voice")]
    Draft,
}

pub struct CLI {
    api: ApiClient,
    session: SessionManager,
}

impl CLI {
    pub fn new() -> Self {
        let base = std::env::var("SERVER_URL").unwrap_or_else(|_| String::from(SERVER_URL));
        let api = ApiClient::new(base).expect("http client");
        let session = SessionManager::new(Box::new(api.clone()), Vault::default());
        Self { api, session }
    }

    pub async fn run(&self) {
        match self.session.resume().await {
            true => self.whoami().await,
            false => println!("{}", "signed out. `login` to start, `help` for commands".dimmed()),
        }
        loop {
            print!("> ");
            let ref mut input = String::new();
            std::io::stdout().flush().unwrap();
            std::io::stdin().read_line(input).unwrap();
            match input.trim() {
                "quit" => break,
                "exit" => break,
                _ => match self.handle(input).await {
                    Err(e) => eprintln!("{}", e.to_string().red()),
                    Ok(_) => continue,
                },
            }
        }
    }

    async fn handle(&self, input: &str) -> Result<(), Box<dyn std::error::Error>> {
        match Visit::try_parse_from(std::iter::once("> ").chain(input.split_whitespace()))? {
            Visit::Login => self.login().await,
            Visit::Google => self.google().await,
            Visit::Logout => {
                self.session.logout().await;
                Ok(println!("{}", "signed out".dimmed()))
            }
            Visit::Whoami => Ok(self.whoami().await),
            Visit::Profile { user } => self.profile(&user).await,
            Visit::Feed => self.feed().await,
            Visit::Read { post } => self.read(&post).await,
            Visit::Publish => self.publish().await,
            Visit::Like { post } => {
                let access = self.session.access().await.ok_or("sign in first")?;
                self.api.like(&access, &post).await?;
                Ok(println!("{}", "liked".red()))
            }
            Visit::Unlike { post } => {
                let access = self.session.access().await.ok_or("sign in first")?;
                self.api.unlike(&access, &post).await?;
                Ok(println!("{}", "unliked".dimmed()))
            }
            Visit::Draft => self.draft().await,
        }
    }

    async fn login(&self) -> Result<(), Box<dyn std::error::Error>> {
        let email: String = Input::new().with_prompt("email").interact_text()?;
        let password = Password::new().with_prompt("password").interact()?;
        let remember = Confirm::new()
            .with_prompt("stay signed in")
            .default(false)
            .interact()?;
        let login = Login::Email { email, password };
        self.session.login(&login, remember).await?;
        Ok(self.whoami().await)
    }

    async fn google(&self) -> Result<(), Box<dyn std::error::Error>> {
        let credential: String = Input::new()
            .with_prompt("paste the Google ID token")
            .interact_text()?;
        let remember = Confirm::new()
            .with_prompt("stay signed in")
            .default(false)
            .interact()?;
        self.session.login(&Login::Google { credential }, remember).await?;
        Ok(self.whoami().await)
    }

    async fn whoami(&self) {
        match self.session.credentials().await {
            None => println!("{}", "signed out".dimmed()),
            Some(c) => match self.api.profile(c.user()).await {
                Ok(profile) => println!("{} {}", "signed in as".green(), profile.username.bold()),
                Err(_) => println!("{} {}", "signed in as".green(), c.user),
            },
        }
    }

    async fn profile(&self, user: &str) -> Result<(), Box<dyn std::error::Error>> {
        let id = user
            .parse::<ID<Account>>()
            .map_err(|_| "that is not a user id")?;
        let profile = self.api.profile(id).await?;
        println!("{}", profile.username.bold());
        println!("{} {}", "email:".dimmed(), profile.email);
        println!("{} {}/{}", "avatar:".dimmed(), self.api.base(), profile.avatar);
        Ok(())
    }

    async fn feed(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ids = self.api.feed(None, PAGE).await?;
        match ids.is_empty() {
            true => Ok(println!("{}", "nothing posted yet".dimmed())),
            false => {
                for id in ids.iter() {
                    let post = self.api.post(id).await?;
                    self.line(&post).await?;
                }
                Ok(())
            }
        }
    }

    async fn line(&self, post: &PostView) -> Result<(), Box<dyn std::error::Error>> {
        let likes = self.api.like_count(&post.id).await?;
        println!(
            "{} {:>4} {}",
            post.id.dimmed(),
            format!("{} ♥", likes).red(),
            post.content
        );
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<(), Box<dyn std::error::Error>> {
        let post = self.api.post(id).await?;
        let likes = self.api.like_count(id).await?;
        println!("{}", post.content.bold());
        println!("{} {}", "by".dimmed(), post.user);
        println!("{} {} ♥", "likes:".dimmed(), likes);
        if let Some(media) = &post.media {
            println!("{} {}/{}", "attached:".dimmed(), self.api.base(), media);
        }
        if let Some(access) = self.session.access().await {
            if self.api.liked(&access, id).await.unwrap_or(false) {
                println!("{}", "you like this".red());
            }
        }
        Ok(())
    }

    async fn publish(&self) -> Result<(), Box<dyn std::error::Error>> {
        let access = self.session.access().await.ok_or("sign in first")?;
        let content: String = Input::new().with_prompt("say something").interact_text()?;
        let post = self.api.publish(&access, &content).await?;
        Ok(println!("{} {}", "published".green(), post.id.dimmed()))
    }

    async fn draft(&self) -> Result<(), Box<dyn std::error::Error>> {
        let access = self.session.access().await.ok_or("sign in first")?;
        let draft = self.api.draft(&access).await?;
        println!("{}", draft.italic());
        match Confirm::new().with_prompt("post it").default(false).interact()? {
            false => Ok(()),
            true => {
                let post = self.api.publish(&access, &draft).await?;
                Ok(println!("{} {}", "published".green(), post.id.dimmed()))
            }
        }
    }
}
