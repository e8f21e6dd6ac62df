/// 内部导出的模块
mod internal;

#[cfg(test)]
mod tests;

pub use internal::error::DavError;

/// 客户端入口：配置、创建、全部 WebDAV 操作
pub mod client {
    use crate::internal;
    pub use internal::client::structs::client_config::*;
    pub use internal::client::structs::dav_client::*;
}

pub mod auth {
    use crate::internal;
    pub use internal::auth::structs::webdav_auth::WebdavAuth;
}

/// 路径模型
pub mod urn {
    use crate::internal;
    pub use internal::urn::structs::urn::Urn;
}

/// 对外提供webdav基础访问能力，不能限制死在客户端中，以防有人自己要用
pub mod webdav {
    pub mod functions {
        use crate::internal;
        pub use internal::webdav::functions::build_request_body::*;
        pub use internal::webdav::functions::parse_response_body::{
            extract_response_for_path, parse_free_space, parse_info, parse_is_directory,
            parse_listing, parse_listing_with_info, parse_property_value,
        };
    }

    pub mod enums {
        use crate::internal;
        pub use internal::webdav::enums::{DavAction, Depth, WebDavMethod};
    }

    pub mod structs {
        use crate::internal;
        pub use internal::webdav::raw_xml::multi_status::MultiStatus;
        pub use internal::webdav::raw_xml::xml_tree::{DAV_NS, MalformedXml, XmlElement};
        pub use internal::webdav::structs::dav_property::DavProperty;
        pub use internal::webdav::structs::resource_info::ResourceInfo;
    }
}

/// 可替换的 HTTP 传输层
pub mod transport {
    use crate::internal;
    pub use internal::transport::structs::reqwest_transport::ReqwestTransport;
    pub use internal::transport::traits::http_transport::*;
}

/// 传输引擎：进度回调与分块流
pub mod transfer {
    use crate::internal;
    pub use internal::transfer::structs::chunk_stream::ChunkStream;
    pub use internal::transfer::traits::progress::{
        AsyncProgressFn, ProgressFn, ProgressHook, SharedProgress, async_progress_fn, progress_fn,
    };
}

pub mod resource {
    use crate::internal;
    pub use internal::resource::structs::resource_handle::ResourceHandle;
}
