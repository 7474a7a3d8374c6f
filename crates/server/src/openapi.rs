use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ObjectIdDoc {
    #[serde(rename = "$oid")]
    pub oid: String,
}

#[derive(ToSchema)]
pub struct UserInputDoc {
    pub username: String,
    pub password: String,
    pub admin: bool,
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub roles: Vec<String>,
    pub courses: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectIdDoc,
    pub username: String,
    pub password: String,
    pub admin: bool,
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub roles: Vec<String>,
    pub courses: Vec<String>,
}

#[derive(ToSchema)]
pub struct UsersResponseDoc { pub users: Vec<UserDoc> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list_users,
        crate::routes::users::search_users,
        crate::routes::users::get_user,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(
        schemas(
            HealthResponse,
            ObjectIdDoc,
            UserInputDoc,
            UserDoc,
            UsersResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_user_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1.0/users/",
            "/api/v1.0/users/search/",
            "/api/v1.0/users/new/",
            "/api/v1.0/users/{username}/",
            "/api/v1.0/users/{username}/edit/",
            "/api/v1.0/users/{username}/remove/",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
