//! 导出文件集成测试

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::fs;

    use namepack::core::{NamepackOptions, SearchContext};
    use namepack::names::{export_package, save_export, DirectorySink};

    use super::common::*;

    #[test]
    fn filtered_sangtacviet_export() {
        let fetcher = StaticFetcher::new().with_page(STV_URL, STV_TWO_BLOCKS);
        let context = SearchContext::new();
        let result = context
            .search(&fetcher, STV_URL, &NamepackOptions::default())
            .unwrap();

        let file = result.export(0, false).unwrap();
        assert_eq!(file.filename, "Gói_1_FILTERED_STV.txt");
        assert_eq!(file.content, "林风=Lâm Phong\n苏瑶=Tô Dao");
    }

    #[test]
    fn original_sangtacviet_export() {
        let fetcher = StaticFetcher::new().with_page(STV_URL, STV_TWO_BLOCKS);
        let context = SearchContext::new();
        let result = context
            .search(&fetcher, STV_URL, &NamepackOptions::default())
            .unwrap();

        let package = result.package(1).unwrap();
        assert!(package.offers_original());

        let file = export_package(package, true);
        assert_eq!(file.filename, "Gói_2_ORIGINAL_STV.txt");
        assert_eq!(
            file.content,
            "天元宗=Thiên Nguyên Tông\na=b=c\n\n长老=trưởng lão"
        );
    }

    #[test]
    fn wikidich_export_uses_slug() {
        let fetcher = StaticFetcher::new().with_page(WIKI_URL, WIKI_PAGE);
        let context = SearchContext::new();
        let result = context
            .search(&fetcher, WIKI_URL, &NamepackOptions::default())
            .unwrap();

        let file = result.export(0, true).unwrap();
        assert_eq!(file.filename, "Names_kiem-lai_.txt");
        assert_eq!(file.content, "林风=Lâm Phong\n苏瑶=Tô Dao\n剑=kiếm");
    }

    #[test]
    fn exports_are_written_to_disk() {
        let fetcher = StaticFetcher::new().with_page(STV_URL, STV_TWO_BLOCKS);
        let context = SearchContext::new();
        let result = context
            .search(&fetcher, STV_URL, &NamepackOptions::default())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        for package in result.packages() {
            save_export(&sink, package, false).unwrap();
        }

        let first = fs::read_to_string(dir.path().join("Gói_1_FILTERED_STV.txt")).unwrap();
        let second = fs::read_to_string(dir.path().join("Gói_2_FILTERED_STV.txt")).unwrap();
        assert_eq!(first, "林风=Lâm Phong\n苏瑶=Tô Dao");
        assert_eq!(second, "天元宗=Thiên Nguyên Tông");
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use std::fs;

    use namepack::core::{NamepackError, NamepackOptions, SearchContext};
    use namepack::names::{save_export, DirectorySink};

    use super::common::*;

    #[test]
    fn unknown_package_index() {
        let fetcher = StaticFetcher::new().with_page(WIKI_URL, WIKI_PAGE);
        let context = SearchContext::new();
        let result = context
            .search(&fetcher, WIKI_URL, &NamepackOptions::default())
            .unwrap();

        assert_eq!(
            result.export(1, false).unwrap_err(),
            NamepackError::PackageNotFound(1)
        );
    }

    #[test]
    fn unwritable_directory() {
        let fetcher = StaticFetcher::new().with_page(WIKI_URL, WIKI_PAGE);
        let context = SearchContext::new();
        let result = context
            .search(&fetcher, WIKI_URL, &NamepackOptions::default())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let sink = DirectorySink::new(&blocker);
        let error = save_export(&sink, &result.packages()[0], false).unwrap_err();
        assert!(matches!(error, NamepackError::IoError(_)));
        assert_eq!(error.exit_code(), 1);
    }
}
