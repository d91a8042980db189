use metagate_schema::GraphqlRequest;
use url::Url;

use super::ADMIN_SECRET_HEADER;

pub struct HasuraApi;

impl HasuraApi {
    pub fn build_request(
        client: &reqwest::Client,
        endpoint: &Url,
        admin_secret: &str,
        query: &str,
    ) -> Result<reqwest::Request, reqwest::Error> {
        client
            .post(endpoint.clone())
            .header(ADMIN_SECRET_HEADER, admin_secret)
            .json(&GraphqlRequest { query })
            .build()
    }
}
